use serde::{Deserialize, Serialize};

use crate::domain::entities::CachedSite;
use crate::domain::errors::SyncError;
use crate::domain::ports::StateStore;
use crate::use_cases::mirror::StateMirror;

// Post statuses that still use id-based URLs and never get the widget.
const HIDDEN_POST_STATUSES: [&str; 5] = ["draft", "auto-draft", "pending", "future", "trash"];

// Page facts supplied by the host when it renders a post.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmbedContext {
    pub post_status: Option<String>,
    pub comment_status: Option<String>,
    #[serde(default)]
    pub comments_open: bool,
    #[serde(default)]
    pub singular: bool,
}

impl EmbedContext {
    pub fn can_embed(&self) -> bool {
        let Some(post_status) = self.post_status.as_deref() else {
            return false;
        };
        if HIDDEN_POST_STATUSES.contains(&post_status) {
            return false;
        }
        self.comment_status.as_deref() == Some("open") && self.comments_open && self.singular
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WidgetConfig {
    pub enabled: bool,
    pub config: Option<CachedSite>,
}

// What the admin screen needs on load.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AdminStatus {
    pub site: Option<CachedSite>,
    pub auth: bool,
}

// Read-only views over the mirror for the embed widget and the admin screen.
pub struct MirrorViews<S> {
    pub mirror: StateMirror<S>,
}

impl<S> MirrorViews<S>
where
    S: StateStore,
{
    pub async fn widget_config(&self, page: &EmbedContext) -> Result<WidgetConfig, SyncError> {
        let site = self.mirror.site().await?;

        match site {
            Some(site) if page.can_embed() => Ok(WidgetConfig {
                enabled: true,
                config: Some(site),
            }),
            _ => Ok(WidgetConfig {
                enabled: false,
                config: None,
            }),
        }
    }

    pub async fn admin_status(&self) -> Result<AdminStatus, SyncError> {
        let site = self.mirror.site().await?;
        let auth = self.mirror.token().await?.is_some();
        Ok(AdminStatus { site, auth })
    }
}
