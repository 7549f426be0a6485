use crate::model::epoch::Epoch;
use crate::model::parameters::LengthTier;

/// Ordinal reading of a 0-100 divergence slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivergenceTier {
    None,
    Slight,
    Moderate,
    High,
}

impl DivergenceTier {
    pub fn from_level(level: u8) -> Self {
        if level > 70 {
            DivergenceTier::High
        } else if level > 40 {
            DivergenceTier::Moderate
        } else if level > 10 {
            DivergenceTier::Slight
        } else {
            DivergenceTier::None
        }
    }
}

/// Builds the generation instruction sent to the LLM.
/// Formatting only: no networking, no validation.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(
        epoch: &Epoch,
        tech_level: u8,
        social_change: u8,
        fantasy_elements: u8,
        length_tier: LengthTier,
    ) -> String {
        let mut prompt = String::new();

        push_setting(&mut prompt, epoch, length_tier);
        push_divergences(&mut prompt, tech_level, social_change, fantasy_elements);
        push_requirements(&mut prompt);

        prompt
    }
}

pub fn length_instruction(tier: LengthTier) -> String {
    let kind = match tier {
        LengthTier::Short => "un court récit",
        LengthTier::Medium => "un récit",
        LengthTier::Long => "un récit détaillé",
    };
    let (low, high) = tier.word_band();
    format!("{kind} de {low} à {high} mots")
}

pub fn tech_clause(level: u8) -> Option<&'static str> {
    match DivergenceTier::from_level(level) {
        DivergenceTier::High => Some("avec des technologies très avancées pour l'époque"),
        DivergenceTier::Moderate => Some("avec quelques innovations technologiques"),
        DivergenceTier::Slight => Some("avec de légères améliorations techniques"),
        DivergenceTier::None => None,
    }
}

pub fn social_clause(level: u8) -> Option<&'static str> {
    match DivergenceTier::from_level(level) {
        DivergenceTier::High => Some("dans une société aux structures radicalement différentes"),
        DivergenceTier::Moderate => Some("avec des changements sociaux notables"),
        DivergenceTier::Slight => Some("avec quelques modifications sociales"),
        DivergenceTier::None => None,
    }
}

pub fn fantasy_clause(level: u8) -> Option<&'static str> {
    match DivergenceTier::from_level(level) {
        DivergenceTier::High => Some("intégrant des éléments magiques subtils"),
        DivergenceTier::Moderate => Some("avec des phénomènes inexpliqués"),
        DivergenceTier::Slight => Some("avec une légère touche de mystère"),
        DivergenceTier::None => None,
    }
}

fn push_setting(prompt: &mut String, epoch: &Epoch, tier: LengthTier) {
    prompt.push_str(&format!(
        "Écris {} se déroulant pendant {}\ndans un monde parallèle où {}\n",
        length_instruction(tier),
        epoch.bare_name(),
        epoch.context,
    ));
}

fn push_divergences(prompt: &mut String, tech: u8, social: u8, fantasy: u8) {
    let clauses: Vec<&str> = [tech_clause(tech), social_clause(social), fantasy_clause(fantasy)]
        .into_iter()
        .flatten()
        .collect();

    if !clauses.is_empty() {
        prompt.push_str(&clauses.join(" "));
        prompt.push_str(".\n");
    }
}

fn push_requirements(prompt: &mut String) {
    prompt.push_str(
        "\nLe récit doit :\n\
         - Ressembler à notre réalité historique sans s'y conformer exactement\n\
         - Présenter une alternative plausible basée sur cette époque\n\
         - Être écrit en français avec un style littéraire\n\
         - Inclure des détails sur la vie quotidienne de cette époque alternative\n\
         \n\
         Commence directement par le récit sans introduction.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::epoch::EPOCHS;

    #[test]
    fn embeds_context_without_date_suffix() {
        for epoch in &EPOCHS {
            for tier in LengthTier::ALL {
                let prompt = PromptBuilder::build(epoch, 55, 5, 90, tier);
                let again = PromptBuilder::build(epoch, 55, 5, 90, tier);

                assert_eq!(prompt, again);
                assert!(prompt.contains(epoch.context));
                assert!(prompt.contains(epoch.bare_name()));
                assert!(!prompt.contains('('), "date range leaked: {prompt}");
            }
        }
    }

    #[test]
    fn tech_thresholds_are_exclusive() {
        let epoch = &EPOCHS[0];
        let cases = [
            (0, None),
            (10, None),
            (11, tech_clause(11)),
            (40, tech_clause(40)),
            (41, tech_clause(41)),
            (70, tech_clause(70)),
            (71, tech_clause(71)),
            (100, tech_clause(100)),
        ];

        assert_eq!(tech_clause(11), Some("avec de légères améliorations techniques"));
        assert_eq!(tech_clause(40), tech_clause(11));
        assert_eq!(tech_clause(41), Some("avec quelques innovations technologiques"));
        assert_eq!(tech_clause(70), tech_clause(41));
        assert_eq!(tech_clause(71), Some("avec des technologies très avancées pour l'époque"));

        let all_tech = [tech_clause(11), tech_clause(41), tech_clause(71)];
        for (level, expected) in cases {
            let prompt = PromptBuilder::build(epoch, level, 0, 0, LengthTier::Short);
            for clause in all_tech.iter().flatten() {
                assert_eq!(
                    prompt.contains(clause),
                    expected == Some(*clause),
                    "level {level}, clause {clause}"
                );
            }
        }
    }

    #[test]
    fn no_clause_line_when_all_levels_are_none() {
        let prompt = PromptBuilder::build(&EPOCHS[2], 0, 10, 3, LengthTier::Long);
        for level in [11, 41, 71] {
            for clause in [tech_clause(level), social_clause(level), fantasy_clause(level)]
                .into_iter()
                .flatten()
            {
                assert!(!prompt.contains(clause));
            }
        }
        assert!(prompt.starts_with("Écris un récit détaillé de 600 à 800 mots"));
    }

    #[test]
    fn length_instruction_quotes_tier_band() {
        assert_eq!(length_instruction(LengthTier::Short), "un court récit de 100 à 200 mots");
        assert_eq!(length_instruction(LengthTier::Medium), "un récit de 300 à 500 mots");
        for tier in LengthTier::ALL {
            let (low, high) = tier.word_band();
            assert!(length_instruction(tier).ends_with(&format!("de {low} à {high} mots")));
        }
    }

    #[test]
    fn template_names_no_epoch() {
        let prompt = PromptBuilder::build(&EPOCHS[4], 100, 100, 100, LengthTier::Medium);
        for other in EPOCHS.iter().filter(|e| e.name != EPOCHS[4].name) {
            assert!(!prompt.to_lowercase().contains(&other.bare_name().to_lowercase()));
        }
    }
}
