//! The 25 animals of the jogo do bicho.

use serde::{Deserialize, Serialize};

/// Animal names indexed by `number - 1`.
const NAMES: [&str; 25] = [
    "Avestruz",
    "Águia",
    "Burro",
    "Borboleta",
    "Cachorro",
    "Cabra",
    "Carneiro",
    "Camelo",
    "Cobra",
    "Coelho",
    "Cavalo",
    "Elefante",
    "Galo",
    "Gato",
    "Jacaré",
    "Leão",
    "Macaco",
    "Porco",
    "Pavão",
    "Peru",
    "Touro",
    "Tigre",
    "Urso",
    "Veado",
    "Vaca",
];

/// Name shown for numbers outside 1..=25.
const UNKNOWN: &str = "Desconhecido";

/// An animal as the backend sends it: its number in the table (1..=25).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Animal(u8);

impl Animal {
    /// Wrap an animal number.
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }

    /// The animal number.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Portuguese name, or `"Desconhecido"` for numbers outside the table.
    #[must_use]
    pub fn name(self) -> &'static str {
        usize::from(self.0)
            .checked_sub(1)
            .and_then(|index| NAMES.get(index))
            .copied()
            .unwrap_or(UNKNOWN)
    }

    /// `"<name> (<number>)"`, as shown in list cards.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} ({})", self.name(), self.0)
    }
}

impl std::fmt::Display for Animal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_bounds() {
        assert_eq!(Animal::new(1).name(), "Avestruz");
        assert_eq!(Animal::new(16).name(), "Leão");
        assert_eq!(Animal::new(25).name(), "Vaca");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(Animal::new(0).name(), UNKNOWN);
        assert_eq!(Animal::new(26).name(), UNKNOWN);
    }

    #[test]
    fn test_label() {
        assert_eq!(Animal::new(2).label(), "Águia (2)");
    }
}
