//! Selection backed by a fixed list of node ids

use super::FigmaClient;
use crate::adapters::traits::SelectionSource;
use crate::domain::{NodeId, Result, SelectableNode};
use async_trait::async_trait;
use std::sync::Arc;

/// Node ids chosen up front (command line or share URLs), resolved against
/// the file on every request so renamed layers pick up their current name
pub struct NodeListSelection {
    client: Arc<FigmaClient>,
    node_ids: Vec<NodeId>,
}

impl NodeListSelection {
    pub fn new(client: Arc<FigmaClient>, node_ids: Vec<NodeId>) -> Self {
        Self { client, node_ids }
    }
}

#[async_trait]
impl SelectionSource for NodeListSelection {
    async fn current_selection(&self) -> Result<Vec<SelectableNode>> {
        self.client.resolve_selection(&self.node_ids).await
    }
}
