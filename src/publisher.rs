// Declaration and data publishing over an ingress transport.
// Message order is preserved as submitted; setup stops at the first failure
// so a half-declared hierarchy is never extended.

use crate::asset_model::AssetModel;
use crate::ingress::IngressTransport;
use crate::models::WindowSnapshot;
use crate::omf::{AssetValues, Container, DataValues, MessageType, StatValue, container_id};
use serde::Serialize;
use serde_json::Value;

pub struct TelemetryPublisher<T> {
    transport: T,
}

impl<T: IngressTransport> TelemetryPublisher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends the full declaration sequence: types, containers, static assets,
    /// then links. Any failure here is fatal to the caller; a link must never
    /// be sent after a failed declaration.
    pub async fn setup(&self, model: &AssetModel) -> anyhow::Result<()> {
        self.send_types(&model.static_type_schemas).await?;
        self.send_types(&model.dynamic_type_schemas).await?;
        self.send_containers(&model.containers).await?;
        self.send_asset_values(&model.provider_values).await?;
        self.send_asset_values(&model.track_values).await?;
        self.send_links(&model.static_links).await?;
        self.send_links(&model.dynamic_links).await?;
        Ok(())
    }

    pub async fn send_types(&self, schemas: &[Value]) -> anyhow::Result<()> {
        self.post(MessageType::Type, schemas).await
    }

    pub async fn send_containers(&self, containers: &[Container]) -> anyhow::Result<()> {
        self.post(MessageType::Container, containers).await
    }

    pub async fn send_asset_values<V: Serialize + Sync>(
        &self,
        values: &AssetValues<V>,
    ) -> anyhow::Result<()> {
        self.post(MessageType::Data, std::slice::from_ref(values))
            .await
    }

    pub async fn send_links<V: Serialize + Sync>(
        &self,
        links: &AssetValues<V>,
    ) -> anyhow::Result<()> {
        self.post(MessageType::Data, std::slice::from_ref(links))
            .await
    }

    /// Publishes one closed window: one containerid entry per track, each
    /// carrying a single point stamped with the window start.
    pub async fn send_data_values(&self, snapshot: &WindowSnapshot) -> anyhow::Result<()> {
        let batch: Vec<DataValues> = snapshot
            .counts
            .iter()
            .map(|c| DataValues {
                containerid: container_id(c.track_id),
                values: vec![StatValue {
                    timestamp: snapshot.window_start,
                    item_count: c.count,
                }],
            })
            .collect();
        self.post(MessageType::Data, &batch).await
    }

    async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        message_type: MessageType,
        body: &B,
    ) -> anyhow::Result<()> {
        let payload = serde_json::to_vec(body)?;
        tracing::debug!(
            messagetype = message_type.as_str(),
            bytes = payload.len(),
            "posting OMF message"
        );
        self.transport.post(message_type, payload).await?;
        Ok(())
    }
}
