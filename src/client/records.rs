use tracing::debug;

use super::TidyDnsClient;
use crate::error::{Error, Result};
use crate::transport::{Form, Transport};
use crate::types::{Record, RecordId, RecordInput, RecordType, ZoneId};
use crate::wire::{self, RecordDetail, RecordRow};

impl<T: Transport> TidyDnsClient<T> {
    /// Create a record and return its id.
    ///
    /// The create endpoint does not reliably echo the new id, so the zone's
    /// merged listing is fetched afterwards and searched for the row with
    /// the same type, name and destination. Synthesized rows (id 0) never
    /// match, and a live row wins over a deleted one with the same triple.
    /// Fails with [`Error::NotFound`] when no such row shows up.
    pub async fn create_record(&self, zone_id: ZoneId, input: &RecordInput) -> Result<RecordId> {
        let form = Form::new()
            .field("type", input.record_type.code())
            .field("name", &input.name)
            .field("ttl", input.ttl)
            .field("description", &input.description)
            .field("status", input.status.code())
            .field("destination", &input.destination)
            .field("location_id", input.location_id);

        self.send_ok(self.post(&format!("/=/record/new/{zone_id}"), form))
            .await?;

        let rows = self.merged_rows(zone_id).await?;
        let created = rows
            .iter()
            .filter(|r| r.id > 0 && r.matches_created(input))
            .min_by_key(|r| r.deleted);
        match created {
            Some(row) => Ok(row.id),
            None => {
                debug!(
                    zone_id,
                    name = %input.name,
                    record_type = %input.record_type,
                    "created record missing from merged listing"
                );
                Err(Error::not_found("unable to find new record"))
            }
        }
    }

    /// Overwrite ttl, description, status, destination and location.
    pub async fn update_record(
        &self,
        zone_id: ZoneId,
        record_id: RecordId,
        input: &RecordInput,
    ) -> Result<()> {
        let form = Form::new()
            .field("ttl", input.ttl)
            .field("description", &input.description)
            .field("status", input.status.code())
            .field("destination", &input.destination)
            .field("location_id", input.location_id);

        self.send_ok(self.post(&format!("/=/record/{record_id}/{zone_id}"), form))
            .await?;
        Ok(())
    }

    pub async fn read_record(&self, zone_id: ZoneId, record_id: RecordId) -> Result<Record> {
        let detail: RecordDetail = self
            .get_json("record", &format!("/=/record/{zone_id}/{record_id}"), &[])
            .await?;
        Record::try_from(detail)
    }

    /// Records in `zone_id` named exactly `name` with type `record_type`.
    pub async fn find_record(
        &self,
        zone_id: ZoneId,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<Record>> {
        let rows: Vec<RecordRow> = self
            .get_json(
                "record search",
                "/=/record",
                &[
                    ("type", "json".into()),
                    ("zone", zone_id.to_string()),
                    ("name", name.into()),
                ],
            )
            .await?;

        rows.into_iter()
            .filter(|r| r.is(name, record_type))
            .map(Record::try_from)
            .collect()
    }

    /// Every row of the zone's merged view, logically deleted ones included.
    /// Rows with a record type this client does not know are skipped.
    pub async fn list_records(&self, zone_id: ZoneId) -> Result<Vec<Record>> {
        let rows = self.merged_rows(zone_id).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match Record::try_from(row) {
                Ok(record) => records.push(record),
                Err(err) => debug!(zone_id, error = %err, "skipping merged row"),
            }
        }
        Ok(records)
    }

    pub async fn delete_record(&self, zone_id: ZoneId, record_id: RecordId) -> Result<()> {
        self.send_ok(self.delete(&format!("/=/record/{record_id}/{zone_id}")))
            .await?;
        Ok(())
    }

    async fn merged_rows(&self, zone_id: ZoneId) -> Result<Vec<RecordRow>> {
        let res = self
            .send_ok(self.get(
                "/=/record_merged",
                &[
                    ("type", "json".into()),
                    ("zone_id", zone_id.to_string()),
                    ("showall", "1".into()),
                ],
            ))
            .await?;
        wire::decode("merged record list", &res.body)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};

    use crate::config::ClientConfig;
    use crate::error::Error;
    use crate::transport::mock::MockTransport;
    use crate::types::{RecordInput, RecordStatus, RecordType};
    use crate::TidyDnsClient;

    const MERGED_CREATED: &str = include_str!("../../tests/fixtures/record_merged_created.json");
    const MERGED_ZONE: &str = include_str!("../../tests/fixtures/record_merged_zone_2861.json");

    fn client(transport: MockTransport) -> TidyDnsClient<MockTransport> {
        TidyDnsClient::with_transport(
            ClientConfig::new("http://tidy.local", "username", "password"),
            transport,
        )
    }

    fn tal_test() -> RecordInput {
        RecordInput::new(RecordType::A, "tal-test", "10.68.1.2")
    }

    #[tokio::test]
    async fn create_record_posts_then_matches_merged_listing() {
        let c = client(MockTransport::new().ok("{}").ok(MERGED_CREATED));
        let mut input = tal_test();
        input.ttl = 300;
        input.description = "Test A record creation".into();
        input.location_id = 1;

        let id = c.create_record(2861, &input).await.unwrap();
        assert_eq!(id, 64694);

        let requests = c.transport.requests();
        assert_eq!(requests.len(), 2);

        let create = &requests[0];
        assert_eq!(create.method, Method::POST);
        assert!(create.url.ends_with("/=/record/new/2861"));
        let form = create.form.as_ref().unwrap();
        assert_eq!(form.get("type"), Some("0"));
        assert_eq!(form.get("name"), Some("tal-test"));
        assert_eq!(form.get("ttl"), Some("300"));
        assert_eq!(form.get("status"), Some("0"));
        assert_eq!(form.get("destination"), Some("10.68.1.2"));
        assert_eq!(form.get("location_id"), Some("1"));

        let lookup = &requests[1];
        assert_eq!(lookup.method, Method::GET);
        assert!(lookup.url.ends_with("/=/record_merged"));
        assert_eq!(lookup.query_value("zone_id"), Some("2861"));
        assert_eq!(lookup.query_value("showall"), Some("1"));
    }

    #[tokio::test]
    async fn create_record_requires_the_full_triple() {
        // same name and destination, different type
        let input = RecordInput::new(RecordType::Cname, "tal-test", "10.68.1.2");
        let c = client(MockTransport::new().ok("{}").ok(MERGED_CREATED));
        let err = c.create_record(2861, &input).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(msg) if msg == "unable to find new record"));
    }

    #[tokio::test]
    async fn create_record_skips_synthesized_and_deleted_rows() {
        let body = r#"[
            {"id": null, "type": 4, "name": "sub", "destination": "a.ns.netic.dk.", "deleted": 1},
            {"id": 512, "type": 4, "name": "sub", "destination": "a.ns.netic.dk.", "status": 2, "deleted": 1},
            {"id": 777, "type": 4, "name": "sub", "destination": "a.ns.netic.dk.", "status": 0, "deleted": 0}
        ]"#;
        let input = RecordInput::new(RecordType::Ns, "sub", "a.ns.netic.dk.");
        let c = client(MockTransport::new().ok("{}").ok(body));
        assert_eq!(c.create_record(1, &input).await.unwrap(), 777);
    }

    #[tokio::test]
    async fn create_record_never_returns_a_synthesized_id() {
        let body = r#"[
            {"id": null, "type": 4, "name": "sub", "destination": "a.ns.netic.dk.", "deleted": 1}
        ]"#;
        let input = RecordInput::new(RecordType::Ns, "sub", "a.ns.netic.dk.");
        let c = client(MockTransport::new().ok("{}").ok(body));
        let err = c.create_record(1, &input).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn create_record_stops_when_post_fails() {
        let c = client(MockTransport::new().respond(StatusCode::BAD_REQUEST, "bad"));
        let err = c.create_record(2861, &tal_test()).await.unwrap_err();
        assert!(matches!(err, Error::UnexpectedStatus(StatusCode::BAD_REQUEST)));
        assert_eq!(c.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn update_record_sends_partial_fields() {
        let c = client(MockTransport::new().ok(MERGED_CREATED));
        let mut input = tal_test();
        input.status = RecordStatus::Inactive;
        c.update_record(2861, 64694, &input).await.unwrap();

        let req = c.transport.only_request();
        assert_eq!(req.method, Method::POST);
        assert!(req.url.ends_with("/=/record/64694/2861"));
        let form = req.form.unwrap();
        assert_eq!(form.get("status"), Some("1"));
        assert_eq!(form.get("destination"), Some("10.68.1.2"));
        assert!(!form.contains("type"));
        assert!(!form.contains("name"));
    }

    #[tokio::test]
    async fn read_record_keeps_typed_status() {
        let c = client(MockTransport::new().ok(include_str!("../../tests/fixtures/record_read.json")));
        let record = c.read_record(2861, 64694).await.unwrap();

        assert_eq!(record.id, 64694);
        assert_eq!(record.record_type, RecordType::A);
        assert_eq!(record.name, "tal-test");
        assert_eq!(record.destination, "10.68.1.2");
        assert_eq!(record.description, "Test A record creation");
        assert_eq!(record.status, Some(RecordStatus::Active));
        assert_eq!(record.location_id, 1);
        assert!(!record.deleted);

        let req = c.transport.only_request();
        assert!(req.url.ends_with("/=/record/2861/64694"));
    }

    #[tokio::test]
    async fn find_record_filters_by_type_and_exact_name() {
        let c = client(MockTransport::new().ok(include_str!("../../tests/fixtures/record_find.json")));
        let found = c
            .find_record(2861, "prod1-api.trifork.shared", RecordType::A)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 65377);
        assert_eq!(found[0].name, "prod1-api.trifork.shared");
        assert_eq!(found[0].ttl, 3600);

        let req = c.transport.only_request();
        assert_eq!(req.query_value("zone"), Some("2861"));
        assert_eq!(req.query_value("name"), Some("prod1-api.trifork.shared"));
    }

    #[tokio::test]
    async fn find_record_drops_loose_name_matches() {
        let body = r#"[
            {"id": 1, "type": 0, "name": "api", "destination": "10.0.0.1"},
            {"id": 2, "type": 0, "name": "api-old", "destination": "10.0.0.2"},
            {"id": 3, "type": 5, "name": "api", "destination": "v=spf1"},
            {"id": 4, "type": 42, "name": "api2", "destination": "?"}
        ]"#;
        let c = client(MockTransport::new().ok(body));
        let found = c.find_record(1, "api", RecordType::A).await.unwrap();
        assert_eq!(found.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn find_record_returns_empty_when_nothing_matches() {
        let c = client(MockTransport::new().ok("[]"));
        let found = c.find_record(1, "nope", RecordType::Txt).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn list_records_normalizes_every_merged_row() {
        let c = client(MockTransport::new().ok(MERGED_ZONE));
        let records = c.list_records(2861).await.unwrap();
        assert_eq!(records.len(), 22);

        let hotrod_txt = &records[0];
        assert_eq!(hotrod_txt.id, 65682);
        assert_eq!(hotrod_txt.record_type, RecordType::Txt);
        assert_eq!(hotrod_txt.status, Some(RecordStatus::Active));

        let inherited = records.iter().find(|r| r.id == 0).unwrap();
        assert_eq!(inherited.record_type, RecordType::Ns);
        assert_eq!(inherited.destination, "a.ns.netic.dk.");
        assert_eq!(inherited.status, None);
        assert!(inherited.deleted);

        let ns = records
            .iter()
            .filter(|r| r.record_type == RecordType::Ns)
            .count();
        assert_eq!(ns, 3);
    }

    #[tokio::test]
    async fn list_records_skips_unknown_record_types() {
        let body = r#"[
            {"id": 1, "type": 0, "name": "www", "destination": "10.0.0.1", "status": 0},
            {"id": 2, "type": 11, "name": "svc", "destination": "1 . alpn=h2", "status": 0},
            {"id": 3, "type": 5, "name": "www", "destination": "v=spf1 -all", "status": 0}
        ]"#;
        let c = client(MockTransport::new().ok(body));
        let records = c.list_records(1).await.unwrap();
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(records[1].record_type, RecordType::Txt);
    }

    #[tokio::test]
    async fn delete_record_is_status_only() {
        let c = client(MockTransport::new().ok("not json at all"));
        c.delete_record(2861, 64694).await.unwrap();

        let req = c.transport.only_request();
        assert_eq!(req.method, Method::DELETE);
        assert!(req.url.ends_with("/=/record/64694/2861"));
        assert!(req.form.is_none());
    }
}
