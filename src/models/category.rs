use std::fmt;

// ---------------------------------------------------------------------------
// Category: the closed set of top-level keys in the catalog payload
// ---------------------------------------------------------------------------

/// A card set label as it appears in the catalog payload.
///
/// The set is closed: [`Category::from_label`] rejects anything not listed in
/// [`Category::ALL`]. The declaration order is the display order used when
/// flattening a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Basic,
    Classic,
    Promo,
    HallOfFame,
    Naxxramas,
    GoblinsVsGnomes,
    BlackrockMountain,
    TheGrandTournament,
    TheLeagueOfExplorers,
    WhispersOfTheOldGods,
    OneNightInKarazhan,
    MeanStreetsOfGadgetzan,
    JourneyToUnGoro,
    TavernBrawl,
    HeroSkins,
    Missions,
    Credits,
    System,
    Debug,
}

/// Label-to-category table, in flattening order.
const LABELS: [(Category, &str); 19] = [
    (Category::Basic, "Basic"),
    (Category::Classic, "Classic"),
    (Category::Promo, "Promo"),
    (Category::HallOfFame, "Hall of Fame"),
    (Category::Naxxramas, "Naxxramas"),
    (Category::GoblinsVsGnomes, "Goblins vs Gnomes"),
    (Category::BlackrockMountain, "Blackrock Mountain"),
    (Category::TheGrandTournament, "The Grand Tournament"),
    (Category::TheLeagueOfExplorers, "The League of Explorers"),
    (Category::WhispersOfTheOldGods, "Whispers of the Old Gods"),
    (Category::OneNightInKarazhan, "One Night in Karazhan"),
    (Category::MeanStreetsOfGadgetzan, "Mean Streets of Gadgetzan"),
    (Category::JourneyToUnGoro, "Journey to Un'Goro"),
    (Category::TavernBrawl, "Tavern Brawl"),
    (Category::HeroSkins, "Hero Skins"),
    (Category::Missions, "Missions"),
    (Category::Credits, "Credits"),
    (Category::System, "System"),
    (Category::Debug, "Debug"),
];

impl Category {
    /// Every category, in the fixed flattening order.
    pub const ALL: [Category; 19] = [
        Category::Basic,
        Category::Classic,
        Category::Promo,
        Category::HallOfFame,
        Category::Naxxramas,
        Category::GoblinsVsGnomes,
        Category::BlackrockMountain,
        Category::TheGrandTournament,
        Category::TheLeagueOfExplorers,
        Category::WhispersOfTheOldGods,
        Category::OneNightInKarazhan,
        Category::MeanStreetsOfGadgetzan,
        Category::JourneyToUnGoro,
        Category::TavernBrawl,
        Category::HeroSkins,
        Category::Missions,
        Category::Credits,
        Category::System,
        Category::Debug,
    ];

    /// Look up a category by its exact payload label (case-sensitive).
    pub fn from_label(label: &str) -> Option<Category> {
        LABELS
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(c, _)| *c)
    }

    /// The payload label, e.g. `"Journey to Un'Goro"`.
    pub fn label(self) -> &'static str {
        LABELS[self.index()].1
    }

    /// Position of this category in the flattening order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_table_matches_declaration_order() {
        for (i, (cat, _)) in LABELS.iter().enumerate() {
            assert_eq!(cat.index(), i);
            assert_eq!(Category::ALL[i], *cat);
        }
    }

    #[test]
    fn punctuated_labels_resolve() {
        assert_eq!(
            Category::from_label("Journey to Un'Goro"),
            Some(Category::JourneyToUnGoro)
        );
        assert_eq!(
            Category::from_label("Hall of Fame"),
            Some(Category::HallOfFame)
        );
        assert_eq!(Category::from_label("hall of fame"), None);
        assert_eq!(Category::GoblinsVsGnomes.to_string(), "Goblins vs Gnomes");
    }
}
