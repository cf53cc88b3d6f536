use uuid::Uuid;

/// Source of collision-resistant job identifiers.
pub trait JobIdSource: Send + Sync {
    fn next_job_id(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidJobIds;

impl JobIdSource for UuidJobIds {
    fn next_job_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generates_distinct_uuid_tokens() {
        let ids = UuidJobIds;
        let generated: HashSet<String> = (0..64).map(|_| ids.next_job_id()).collect();

        assert_eq!(generated.len(), 64);
        assert!(generated
            .iter()
            .all(|id| Uuid::parse_str(id).is_ok() && id.len() == 36));
    }
}
