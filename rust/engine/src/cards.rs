use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the five colors of mana.
/// Declaration order is the conventional WUBRG order and drives `Ord`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Color {
    /// White (W)
    #[serde(rename = "W")]
    White,
    /// Blue (U)
    #[serde(rename = "U")]
    Blue,
    /// Black (B)
    #[serde(rename = "B")]
    Black,
    /// Red (R)
    #[serde(rename = "R")]
    Red,
    /// Green (G)
    #[serde(rename = "G")]
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    /// Name of the basic land that produces this color.
    pub fn basic_land_name(self) -> &'static str {
        match self {
            Color::White => "Plains",
            Color::Blue => "Island",
            Color::Black => "Swamp",
            Color::Red => "Mountain",
            Color::Green => "Forest",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A set of colors stored as a bitmask. The empty set means colorless.
///
/// Serialized as its symbols in WUBRG order, e.g. `"WU"`; colorless is `""`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ColorSet(u8);

impl ColorSet {
    pub const fn empty() -> Self {
        ColorSet(0)
    }

    pub fn all() -> Self {
        Color::ALL.into_iter().collect()
    }

    pub fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= color.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_subset(self, other: ColorSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// Colors in WUBRG order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::empty();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.iter() {
            write!(f, "{}", c.symbol())?;
        }
        Ok(())
    }
}

impl FromStr for ColorSet {
    type Err = String;

    /// Parses color symbols in any order; separators like `,` and spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = ColorSet::empty();
        for ch in s.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            let color =
                Color::from_symbol(ch).ok_or_else(|| format!("unknown color symbol '{}'", ch))?;
            set.insert(color);
        }
        Ok(set)
    }
}

impl From<ColorSet> for String {
    fn from(set: ColorSet) -> Self {
        set.to_string()
    }
}

impl TryFrom<String> for ColorSet {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Printed rarity. Ordering is the rarity tier: common < uncommon < rare < mythic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Mythic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary card type derived from a type line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Planeswalker,
    Battle,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
    Other,
}

impl CardType {
    /// Classifies a type line such as `"Legendary Artifact Creature — Golem"`.
    ///
    /// Only the part before the em dash (or a spaced hyphen) is inspected.
    /// Lands win over everything, creatures over every other spell type.
    pub fn classify(type_line: &str) -> CardType {
        let main = type_line
            .split('—')
            .next()
            .unwrap_or_default()
            .split(" - ")
            .next()
            .unwrap_or_default();
        let has = |word: &str| main.split_whitespace().any(|w| w.eq_ignore_ascii_case(word));
        const PRECEDENCE: [(&str, CardType); 8] = [
            ("Land", CardType::Land),
            ("Creature", CardType::Creature),
            ("Planeswalker", CardType::Planeswalker),
            ("Battle", CardType::Battle),
            ("Instant", CardType::Instant),
            ("Sorcery", CardType::Sorcery),
            ("Enchantment", CardType::Enchantment),
            ("Artifact", CardType::Artifact),
        ];
        PRECEDENCE
            .iter()
            .find(|(word, _)| has(word))
            .map(|(_, t)| *t)
            .unwrap_or(CardType::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardType::Creature => "Creature",
            CardType::Planeswalker => "Planeswalker",
            CardType::Battle => "Battle",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
            CardType::Enchantment => "Enchantment",
            CardType::Artifact => "Artifact",
            CardType::Land => "Land",
            CardType::Other => "Other",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable catalog entry for one printed card.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CardRecord {
    /// Stable identifier (Scryfall id or similar)
    pub id: String,
    pub name: String,
    /// Converted mana cost
    pub mana_value: u32,
    /// Color identity; empty means colorless
    pub color_identity: ColorSet,
    pub type_line: String,
    pub rarity: Rarity,
    /// True for every land, basic or not
    pub is_land: bool,
}

impl CardRecord {
    /// Builds a record, deriving the land flag from the type line.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mana_value: u32,
        color_identity: ColorSet,
        type_line: impl Into<String>,
        rarity: Rarity,
    ) -> Self {
        let type_line = type_line.into();
        let is_land = CardType::classify(&type_line) == CardType::Land;
        Self {
            id: id.into(),
            name: name.into(),
            mana_value,
            color_identity,
            type_line,
            rarity,
            is_land,
        }
    }

    pub fn primary_type(&self) -> CardType {
        if self.is_land {
            CardType::Land
        } else {
            CardType::classify(&self.type_line)
        }
    }

    pub fn is_creature(&self) -> bool {
        self.primary_type() == CardType::Creature
    }

    pub fn is_basic_land(&self) -> bool {
        self.is_land && self.type_line.split_whitespace().any(|w| w == "Basic")
    }

    pub fn is_colorless(&self) -> bool {
        self.color_identity.is_empty()
    }
}
