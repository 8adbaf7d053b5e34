//! Nearest-reach lookup from a latitude/longitude pair.

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::layout::DataLayout;
use crate::region::RegionIndex;
use crate::zarr::ZarrArray;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// The reach whose centroid lies closest to a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearestReach {
    pub reach_id: u64,
    pub region: String,
    pub distance_km: f64,
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub(crate) fn nearest(layout: &DataLayout, regions: &RegionIndex, lat: f64, lon: f64) -> Result<NearestReach> {
    let mut best: Option<NearestReach> = None;

    for region in regions.names() {
        let path = layout.centroids_array(region);
        // Regions without a centroid store are skipped; any other failure aborts.
        let array = match ZarrArray::open(&path, String::new) {
            Ok(array) => array,
            Err(StoreError::NotFound(_)) => continue,
            Err(e) => return Err(e),
        };
        array.expect_rank(2)?;
        if array.shape()[1] != 2 {
            return Err(StoreError::invalid_metadata(format!(
                "Centroids for region {} have {} columns, expected lat and lon",
                region,
                array.shape()[1]
            )));
        }
        let reach_ids: Vec<u64> = array.axis_labels("rivid", 0)?;
        let coords = array.read_all()?;

        for (&reach_id, pair) in reach_ids.iter().zip(coords.chunks_exact(2)) {
            let (rlat, rlon) = (pair[0], pair[1]);
            if !rlat.is_finite() || !rlon.is_finite() {
                continue;
            }
            let distance_km = haversine_km(lat, lon, rlat, rlon);
            if best.as_ref().map_or(true, |b| distance_km < b.distance_km) {
                best = Some(NearestReach {
                    reach_id,
                    region: region.to_string(),
                    distance_km,
                });
            }
        }
    }

    let found = best.ok_or_else(|| {
        StoreError::not_found(format!("No reach found near lat {} lon {}", lat, lon))
    })?;
    debug!(lat, lon, reach_id = found.reach_id, region = %found.region, "Resolved reach from coordinates");
    Ok(found)
}
