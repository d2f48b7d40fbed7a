//! Sample records for seeding the store

use chrono::{Duration, NaiveDate};
use formdesk_common::{Payload, Record};
use rand::seq::SliceRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chloe", "Dmitri", "Elena", "Farah", "Gustav", "Hana", "Ivan", "Julia",
    "Kofi", "Lena", "Mateo", "Nora", "Oskar", "Priya", "Quinn", "Rosa", "Sami", "Tomas",
];

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua",
];

const PLAN_TYPES: &[&str] = &["generic", "holiday"];

fn words<R: Rng>(rng: &mut R, count: usize) -> String {
    (0..count)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `count` random records with ids "0".."count-1", in that order
pub fn sample_records<R: Rng>(count: usize, rng: &mut R) -> Vec<Record> {
    let epoch = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN);
    (0..count)
        .map(|i| {
            let start = epoch + Duration::days(rng.gen_range(0..365));
            let end = start + Duration::days(rng.gen_range(0..14));
            let mut fields = Payload::new();
            let user = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
            fields.insert("user".into(), user.into());
            fields.insert("title".into(), words(rng, 3));
            let kind = PLAN_TYPES.choose(rng).copied().unwrap_or("generic");
            fields.insert("type".into(), kind.into());
            fields.insert("startDate".into(), start.format("%Y-%m-%d").to_string());
            fields.insert("endDate".into(), end.format("%Y-%m-%d").to_string());
            fields.insert("description".into(), words(rng, 6));
            Record::new(i.to_string(), fields)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_records_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = sample_records(5, &mut rng);
        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, i.to_string());
            assert!(!record.get_or_empty("user").is_empty());
            assert_eq!(record.get_or_empty("title").split(' ').count(), 3);
            assert!(record.get_or_empty("startDate") <= record.get_or_empty("endDate"));
        }
    }
}
