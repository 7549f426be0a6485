/// A historical period used to seed generation.
/// The catalog below is loaded once and never mutated.
#[derive(Debug, PartialEq, Eq)]
pub struct Epoch {
    /// Display name, including the date range suffix, e.g. "Renaissance (1400-1600)"
    pub name: &'static str,
    pub description: &'static str,
    pub context: &'static str,
    pub keywords: &'static [&'static str],
}

impl Epoch {
    /// Name with the parenthesized date range removed.
    pub fn bare_name(&self) -> &'static str {
        bare_name(self.name)
    }
}

pub fn bare_name(name: &str) -> &str {
    match name.split_once('(') {
        Some((head, _)) => head.trim(),
        None => name.trim(),
    }
}

pub static EPOCHS: [Epoch; 5] = [
    Epoch {
        name: "Renaissance (1400-1600)",
        description: "Époque de renouveau artistique et scientifique en Europe",
        context: "À la Renaissance, l'Europe connaît un renouveau artistique, scientifique et culturel. Les grandes découvertes transforment la vision du monde.",
        keywords: &["art", "science", "humanisme", "exploration", "inventions"],
    },
    Epoch {
        name: "Révolution française (1789-1799)",
        description: "Période de bouleversements politiques et sociaux en France",
        context: "La Révolution française marque la fin de l'Ancien Régime et l'émergence de nouveaux idéaux démocratiques.",
        keywords: &["révolution", "liberté", "égalité", "fraternité", "république"],
    },
    Epoch {
        name: "Révolution industrielle (1760-1840)",
        description: "Transformation économique et sociale par la mécanisation",
        context: "La révolution industrielle transforme radicalement les modes de production et la société européenne.",
        keywords: &["industrie", "machines", "vapeur", "usines", "urbanisation"],
    },
    Epoch {
        name: "Belle Époque (1871-1914)",
        description: "Période de prospérité et d'innovations en Europe",
        context: "La Belle Époque est marquée par l'optimisme, les innovations techniques et l'épanouissement culturel.",
        keywords: &["progrès", "innovations", "électricité", "automobile", "cinéma"],
    },
    Epoch {
        name: "Années folles (1920-1929)",
        description: "Décennie d'euphorie et de modernité après la Grande Guerre",
        context: "Les Années folles sont une période d'effervescence culturelle et de prospérité économique.",
        keywords: &["jazz", "modernité", "libération", "économie", "arts"],
    },
];

/// Exact lookup by display name.
pub fn find_epoch(name: &str) -> Option<&'static Epoch> {
    EPOCHS.iter().find(|e| e.name == name)
}

pub fn default_epoch() -> &'static Epoch {
    &EPOCHS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_strips_date_range() {
        assert_eq!(EPOCHS[0].bare_name(), "Renaissance");
        assert_eq!(EPOCHS[3].bare_name(), "Belle Époque");
        assert_eq!(bare_name("Sans date"), "Sans date");
    }

    #[test]
    fn lookup_is_exact() {
        assert!(find_epoch("Années folles (1920-1929)").is_some());
        assert!(find_epoch("Années folles").is_none());
    }

    #[test]
    fn catalog_names_are_unique() {
        for (i, a) in EPOCHS.iter().enumerate() {
            for b in &EPOCHS[i + 1..] {
                assert_ne!(a.bare_name(), b.bare_name());
            }
        }
    }
}
