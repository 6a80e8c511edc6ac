//! Candid UI Panel
//!
//! Builds the embeddable Candid UI view for a deployed canister. Canister
//! ids come from two `canister_ids.json` files: the project's own and the
//! one of the Candid UI canister shipped with the extension. Missing files or
//! ids produce an informational message, never an error.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::config::CandidUiConfig;

/// Canister serving the Candid UI
pub const CANDID_CANISTER_NAME: &str = "didjs";

/// Network whose ids are read
pub const DEPLOYMENT_ENVIRONMENT: &str = "local";

/// Port the extension host forwards the webview port to
pub const EXTENSION_HOST_PORT: u16 = 8000;

/// Panel identifier used by the host
pub const VIEW_TYPE: &str = "dfx.candidUIPreview";

const PANEL_TITLE: &str = "Candid UI";

/// What the host should show for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// Open a webview panel with this content
    Webview(Webview),
    /// Show an informational message instead
    Info(String),
}

/// A rendered webview panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Webview {
    pub view_type: &'static str,
    pub title: &'static str,
    /// Port seen inside the webview
    pub webview_port: u16,
    /// Port it maps to on the extension host
    pub extension_host_port: u16,
    pub html: String,
}

/// Resolves canister ids and renders the Candid UI panel
#[derive(Debug)]
pub struct CandidUiPanel {
    canister_ids_path: Option<PathBuf>,
    candid_ids_path: PathBuf,
    port: u16,
    canister_ids: Option<Value>,
    candid_ids: Option<Value>,
}

impl CandidUiPanel {
    /// Create a panel and read both id files
    pub fn new(workspace_root: Option<&Path>, extension_path: &Path, port: u16) -> Self {
        let mut panel = Self {
            canister_ids_path: workspace_root.map(canister_ids_file),
            candid_ids_path: canister_ids_file(&extension_path.join("tools").join("ui")),
            port,
            canister_ids: None,
            candid_ids: None,
        };
        panel.refresh();
        panel
    }

    /// Create a panel from configuration; without an extension path the UI
    /// ids are looked up under the workspace root
    pub fn from_config(config: &CandidUiConfig) -> Self {
        let extension_path = config
            .extension_path
            .as_deref()
            .unwrap_or(config.workspace_root.as_path());
        Self::new(Some(&config.workspace_root), extension_path, config.port)
    }

    /// Re-read both id files. Unreadable or invalid files count as absent.
    pub fn refresh(&mut self) {
        if let Some(path) = &self.canister_ids_path {
            self.canister_ids = read_ids(path);
        }
        self.candid_ids = read_ids(&self.candid_ids_path);
    }

    /// Render the panel for a tree item label of the form `<canister>: ...`
    pub fn open(&self, item_label: &str) -> PanelView {
        let key = item_label.split(':').next().unwrap_or(item_label);

        let Some(candid_ids) = &self.candid_ids else {
            return PanelView::Info(
                "Could not acquire Candid UI canister file. Have you deployed Candid?".to_string(),
            );
        };
        let Some(canister_ids) = &self.canister_ids else {
            return PanelView::Info(format!(
                "Could not acquire deployed {key} canister file. Have you properly deployed the canister?"
            ));
        };

        match (
            canister_id(candid_ids, CANDID_CANISTER_NAME),
            canister_id(canister_ids, key),
        ) {
            (Some(ui_id), Some(id)) => {
                info!(canister = key, "opening Candid UI");
                PanelView::Webview(Webview {
                    view_type: VIEW_TYPE,
                    title: PANEL_TITLE,
                    webview_port: self.port,
                    extension_host_port: EXTENSION_HOST_PORT,
                    html: self.webview_content(&ui_id, &id),
                })
            }
            _ => PanelView::Info("Could not get proper configuration for opening Candid UI".to_string()),
        }
    }

    /// URL of the Candid UI for a canister
    pub fn candid_url(&self, ui_canister_id: &str, canister_id: &str) -> String {
        format!(
            "http://localhost:{}/?canisterId={}&id={}",
            self.port, ui_canister_id, canister_id
        )
    }

    fn webview_content(&self, ui_canister_id: &str, canister_id: &str) -> String {
        let url = self.candid_url(ui_canister_id, canister_id);
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{PANEL_TITLE}</title>
    <style>
        html {{ width: 100%; height: 100%; min-height: 100%; display: flex; }}
        body {{ flex: 1; display: flex; }}
        iframe {{ flex: 1; border: none; background: white; }}
    </style>
</head>
<body>
    <iframe src="{url}"></iframe>
</body>
</html>"#
        )
    }
}

fn canister_ids_file(root: &Path) -> PathBuf {
    root.join(".dfx").join(DEPLOYMENT_ENVIRONMENT).join("canister_ids.json")
}

fn read_ids(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unparsable canister ids");
            None
        }
    }
}

/// `data[name].local`, as text
fn canister_id(data: &Value, name: &str) -> Option<String> {
    match data.get(name)?.get(DEPLOYMENT_ENVIRONMENT)? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::String(_) | Value::Null | Value::Bool(false) => None,
        other => Some(other.to_string()),
    }
}
