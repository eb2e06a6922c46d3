//! Fetch everything a view needs before it is shown.

use tracing::{debug, warn};

use crate::error::{NavigationError, ResourceKind};
use crate::site::types::{Chapter, SeriesInfo, SeriesSummary, VolumeManifest, VolumeSummary};
use crate::site::CachedSiteClient;

use super::route::ViewDescriptor;

/// Loaded data for a view. Only ever built complete.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
  Home {
    series: Vec<SeriesSummary>,
  },
  SeriesDetail {
    info: SeriesInfo,
    volumes: Vec<VolumeSummary>,
  },
  VolumeRead {
    manifest: VolumeManifest,
    chapter: Chapter,
  },
}

impl ViewData {
  pub fn manifest(&self) -> Option<&VolumeManifest> {
    match self {
      Self::VolumeRead { manifest, .. } => Some(manifest),
      _ => None,
    }
  }
}

pub async fn resolve(
  client: &CachedSiteClient,
  view: &ViewDescriptor,
) -> Result<ViewData, NavigationError> {
  debug!(%view, "resolving view");

  let result = match view {
    ViewDescriptor::Home => client
      .series_index()
      .await
      .map(|series| ViewData::Home { series })
      .map_err(|e| NavigationError::unavailable(ResourceKind::SeriesIndex, e)),

    ViewDescriptor::SeriesDetail { series_id } => {
      let info = async {
        client
          .series_info(series_id)
          .await
          .map_err(|e| NavigationError::unavailable(ResourceKind::SeriesInfo, e))
      };
      let volumes = async {
        client
          .volumes(series_id)
          .await
          .map_err(|e| NavigationError::unavailable(ResourceKind::VolumeList, e))
      };
      futures::try_join!(info, volumes).map(|(info, volumes)| ViewData::SeriesDetail { info, volumes })
    }

    ViewDescriptor::VolumeRead {
      series_id,
      volume,
      chapter,
    } => resolve_volume(client, series_id, *volume, *chapter).await,
  };

  if let Err(e) = &result {
    warn!(%view, error = %e, "view could not be resolved");
  }
  result
}

async fn resolve_volume(
  client: &CachedSiteClient,
  series_id: &str,
  volume: u32,
  index: usize,
) -> Result<ViewData, NavigationError> {
  let manifest = client
    .volume_manifest(series_id, volume)
    .await
    .map_err(|e| NavigationError::unavailable(ResourceKind::VolumeManifest, e))?;

  let Some(entry) = manifest.chapters.get(index) else {
    return Err(NavigationError::chapter_not_found(index, manifest));
  };

  let chapter = client
    .chapter(series_id, volume, &entry.file)
    .await
    .map_err(|e| {
      NavigationError::unavailable(ResourceKind::Chapter, e).with_manifest(manifest.clone())
    })?;

  Ok(ViewData::VolumeRead { manifest, chapter })
}
