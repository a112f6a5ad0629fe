use crate::runtime::dns::{RecordChange, RecordObservation};

pub trait DnsStore {
    fn list_hosted_zone_ids(&self) -> Result<Vec<String>, String>;

    /// First record set at or after `record_name`/`record_type` in the
    /// zone's ordering. Callers must still check the returned record
    /// actually matches the query.
    fn first_record_from(
        &self,
        zone_id: &str,
        record_name: &str,
        record_type: &str,
    ) -> Result<Option<RecordObservation>, String>;

    fn upsert_record(&self, zone_id: &str, change: &RecordChange) -> Result<(), String>;
}
