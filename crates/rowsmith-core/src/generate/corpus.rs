//! # Text Corpus
//!
//! `name` and `address` fields draw from a corpus. The engine only needs
//! "a plausible string"; which word lists back it is the corpus's business.
//! `FakeCorpus` uses the `fake` crate's English locale.

use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::RngCore;

/// Source of person names and postal addresses.
pub trait TextCorpus: Send + Sync {
    fn full_name(&self, rng: &mut dyn RngCore) -> String;
    fn address(&self, rng: &mut dyn RngCore) -> String;
}

/// English names and US-style addresses from the `fake` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeCorpus;

impl TextCorpus for FakeCorpus {
    fn full_name(&self, rng: &mut dyn RngCore) -> String {
        Name().fake_with_rng(rng)
    }

    fn address(&self, rng: &mut dyn RngCore) -> String {
        let number: String = BuildingNumber().fake_with_rng(rng);
        let street: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);
        let state: String = StateAbbr().fake_with_rng(rng);
        let zip: String = ZipCode().fake_with_rng(rng);
        format!("{} {}, {}, {} {}", number, street, city, state, zip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_fake_corpus_produces_text() {
        let mut rng = StdRng::seed_from_u64(42);
        let name = FakeCorpus.full_name(&mut rng);
        assert!(name.contains(' '), "full name should have two parts: {}", name);

        let address = FakeCorpus.address(&mut rng);
        assert_eq!(address.matches(", ").count(), 2, "address: {}", address);
    }

    #[test]
    fn test_fake_corpus_is_deterministic_per_seed() {
        let mut rng1 = StdRng::seed_from_u64(7);
        let mut rng2 = StdRng::seed_from_u64(7);
        assert_eq!(FakeCorpus.full_name(&mut rng1), FakeCorpus.full_name(&mut rng2));
    }
}
