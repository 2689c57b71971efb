use fake::Fake;
use rand::RngCore;

use crate::faker_rs::locales::LocaleKey;

/// Corpus entries exposed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FakerKind {
    FullName,
    City,
    Country,
    State,
    StateAbbr,
    StreetName,
    BuildingNumber,
    ZipCode,
    PhoneNumber,
    Bs,
}

/// Thin locale-aware facade over the `fake` corpus.
pub struct FakeRsAdapter;

impl FakeRsAdapter {
    pub fn text(kind: FakerKind, locale: LocaleKey, rng: &mut dyn RngCore) -> String {
        match locale {
            LocaleKey::EnUs => en(kind, rng),
            LocaleKey::PtBr => pt_br(kind, rng),
        }
    }
}

fn en(kind: FakerKind, rng: &mut dyn RngCore) -> String {
    use fake::faker::address::en as address;
    use fake::faker::company::en as company;
    use fake::faker::name::en as name;
    use fake::faker::phone_number::en as phone;

    match kind {
        FakerKind::FullName => name::Name().fake_with_rng(rng),
        FakerKind::City => address::CityName().fake_with_rng(rng),
        FakerKind::Country => address::CountryName().fake_with_rng(rng),
        FakerKind::State => address::StateName().fake_with_rng(rng),
        FakerKind::StateAbbr => address::StateAbbr().fake_with_rng(rng),
        FakerKind::StreetName => address::StreetName().fake_with_rng(rng),
        FakerKind::BuildingNumber => address::BuildingNumber().fake_with_rng(rng),
        FakerKind::ZipCode => address::ZipCode().fake_with_rng(rng),
        FakerKind::PhoneNumber => phone::PhoneNumber().fake_with_rng(rng),
        FakerKind::Bs => company::Bs().fake_with_rng(rng),
    }
}

fn pt_br(kind: FakerKind, rng: &mut dyn RngCore) -> String {
    use fake::faker::address::pt_br as address;
    use fake::faker::company::pt_br as company;
    use fake::faker::name::pt_br as name;
    use fake::faker::phone_number::pt_br as phone;

    match kind {
        FakerKind::FullName => name::Name().fake_with_rng(rng),
        FakerKind::City => address::CityName().fake_with_rng(rng),
        FakerKind::Country => address::CountryName().fake_with_rng(rng),
        FakerKind::State => address::StateName().fake_with_rng(rng),
        FakerKind::StateAbbr => address::StateAbbr().fake_with_rng(rng),
        FakerKind::StreetName => address::StreetName().fake_with_rng(rng),
        FakerKind::BuildingNumber => address::BuildingNumber().fake_with_rng(rng),
        FakerKind::ZipCode => address::ZipCode().fake_with_rng(rng),
        FakerKind::PhoneNumber => phone::PhoneNumber().fake_with_rng(rng),
        FakerKind::Bs => company::Bs().fake_with_rng(rng),
    }
}
