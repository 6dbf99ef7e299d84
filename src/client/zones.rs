use tracing::debug;

use super::TidyDnsClient;
use crate::error::{Error, Result};
use crate::transport::Transport;
use crate::types::{Zone, ZoneId};
use crate::wire::ZoneRow;

impl<T: Transport> TidyDnsClient<T> {
    pub async fn list_zones(&self) -> Result<Vec<Zone>> {
        let rows: Vec<ZoneRow> = self
            .get_json("zone list", "/=/zone", &[("type", "json".into())])
            .await?;
        Ok(rows.into_iter().map(Zone::from).collect())
    }

    /// Id of the zone named exactly `name`. The service matches names
    /// loosely, so near-misses in its answer are skipped.
    pub async fn find_zone_id(&self, name: &str) -> Result<ZoneId> {
        let rows: Vec<ZoneRow> = self
            .get_json(
                "zone search",
                "/=/zone",
                &[("type", "json".into()), ("name", name.into())],
            )
            .await?;

        if rows.is_empty() {
            return Err(Error::not_found(format!("zone not found for: {name}")));
        }

        match rows.iter().find(|z| z.name == name) {
            Some(zone) => Ok(zone.id),
            None => {
                debug!(%name, candidates = rows.len(), "no exact zone name match");
                Err(Error::not_found(format!("unable to match zone name: {name}")))
            }
        }
    }
}
