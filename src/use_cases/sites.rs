use serde_json::Value;

use crate::domain::entities::{AddedSite, CachedSite, SiteSummary, Theme, Token};
use crate::domain::errors::SyncError;
use crate::domain::ports::StateStore;
use crate::domain::remote::{
    AddSiteRequest, CommentsApi, RemoteSite, SiteEnvelope, SiteSettings,
};
use crate::use_cases::mirror::StateMirror;

// Owns the link between remote site responses and the cached site mirror.
pub struct SiteRegistry<A, S> {
    pub api: A,
    pub mirror: StateMirror<S>,
}

impl<A, S> SiteRegistry<A, S>
where
    A: CommentsApi,
    S: StateStore,
{
    // Lists the account's sites. Missing credentials or a failed call yield an empty list.
    pub async fn get_sites(&self, token: Option<&Token>) -> Vec<SiteSummary> {
        let Some(token) = token else {
            return Vec::new();
        };

        match self.api.get_sites(token).await {
            Ok(records) => records.into_iter().map(SiteSummary::from).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "site listing failed; returning no sites.");
                Vec::new()
            }
        }
    }

    pub async fn add_site(
        &self,
        token: Option<&Token>,
        req: AddSiteRequest,
    ) -> Result<AddedSite, SyncError> {
        let token = token.ok_or(SyncError::NotAuthenticated)?;
        let envelope = self.api.add_site(token, &req).await?;

        let mirror = match envelope.data.as_ref().and_then(mirror_for_new_site) {
            Some(mirror) => mirror,
            None => return Err(SyncError::Unaccepted(envelope)),
        };

        self.mirror.save_site(&mirror).await?;
        tracing::info!(website_id = %mirror.website_id, "site created and cached.");

        let data = envelope.into_inner().data.unwrap_or_default();
        Ok(AddedSite {
            website_id: mirror.website_id,
            website_name: req.name,
            website_url: req.url,
            widget_position: data.widget_position,
            is_open: data.is_open,
            comment_status: data.comment_status,
            language_id: data.language_id,
            colors: Vec::new(),
        })
    }

    // Field errors win over everything else in the response and block the cache write.
    pub async fn update_site_settings(
        &self,
        token: Option<&Token>,
        params: Value,
    ) -> Result<SiteEnvelope, SyncError> {
        let token = token.ok_or(SyncError::NotAuthenticated)?;
        let envelope = self.api.update_site_settings(token, &params).await?;

        let candidate = envelope.data.as_ref().and_then(mirror_for_settings);

        if let Some(errors) = &envelope.errors {
            return Err(SyncError::Rejected {
                errors: errors.clone(),
            });
        }

        let Some(candidate) = candidate else {
            return Err(SyncError::Unaccepted(envelope));
        };

        self.mirror.save_site(&candidate).await?;
        tracing::info!(website_id = %candidate.website_id, "site settings cached.");

        Ok(envelope)
    }

    // Read-through only; the mirror is not touched.
    pub async fn get_site_settings(
        &self,
        id: &str,
        token: Option<&Token>,
    ) -> Result<SiteSettings, SyncError> {
        let token = token.ok_or(SyncError::NotAuthenticated)?;
        Ok(self.api.get_site_settings(id, token).await?)
    }

    pub async fn cached_site(&self) -> Result<Option<CachedSite>, SyncError> {
        self.mirror.site().await
    }

    pub async fn save_cached_site(&self, site: &CachedSite) -> Result<(), SyncError> {
        self.mirror.save_site(site).await
    }
}

// Creation responses are cached without language or colours.
fn mirror_for_new_site(data: &RemoteSite) -> Option<CachedSite> {
    Some(CachedSite {
        website_id: data.website_id.clone()?,
        is_open: data.is_open.unwrap_or(false),
        widget_position: data.widget_position.clone(),
        language_id: None,
        theme: None,
    })
}

fn mirror_for_settings(data: &RemoteSite) -> Option<CachedSite> {
    Some(CachedSite {
        website_id: data.website_id.clone()?,
        is_open: data.is_open.unwrap_or(false),
        widget_position: data.widget_position.clone(),
        language_id: data.language_id.clone(),
        theme: data.colors.as_deref().and_then(Theme::from_colors),
    })
}
