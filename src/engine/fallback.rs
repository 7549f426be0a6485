use crate::model::epoch::{default_epoch, Epoch, EPOCHS};

pub const RENAISSANCE_STORY: &str = "À Florence, les ateliers ne ferment jamais. Depuis que Léonard a confié ses carnets à la guilde des horlogers, des automates de bois et de laiton portent l'eau des fontaines jusqu'aux étages des palais. Giulia, apprentie peintre, mélange ses pigments à la lueur d'une lampe à miroirs qui capte la lumière de la lune. Sur le Ponte Vecchio, les marchands échangent des cartes d'un nouveau monde que personne n'a encore visité, dessinées d'après les rêves d'un navigateur génois. Chaque soir, la cloche du Duomo sonne une heure de plus que la veille, et les Florentins ont appris à vivre dans ce temps qui s'allonge doucement.";

pub const FRENCH_REVOLUTION_STORY: &str = "Paris, an II de la République. Les assemblées de quartier se réunissent désormais dans les anciennes églises, où des tableaux de craie remplacent les vitraux. Marianne Dufour, imprimeuse rue de la Harpe, compose chaque matin la gazette des sections que l'on distribue par ballons captifs au-dessus des toits. Le roi n'a pas été jugé : il enseigne l'horlogerie à l'école des arts et métiers, sous le regard curieux des enfants du faubourg. Dans les cafés, on débat d'une constitution écrite à mille mains, et chaque citoyen peut y ajouter une ligne avant l'aube.";

pub const INDUSTRIAL_REVOLUTION_STORY: &str = "À Manchester, la vapeur chante plus qu'elle ne gronde. Les filatures ont été bâties autour de jardins suspendus que les ouvriers entretiennent pendant la pause de midi, et les cheminées rejettent une brume parfumée à la lavande. Thomas Ashby, mécanicien, règle les engrenages d'un métier à tisser qui compose des motifs selon l'humeur de la personne qui le guide. Dans les rues pavées, des tramways sans chevaux glissent sur des rails de cuivre, et le dimanche, les familles montent à bord de dirigeables pour voir la ville d'en haut.";

pub const BELLE_EPOQUE_STORY: &str = "Paris brille d'une lumière nouvelle depuis que la tour de M. Eiffel capte la foudre pour éclairer les boulevards. Au Moulin-Rouge, les danseuses portent des robes tissées de fils électriques qui scintillent au rythme de la musique. Dans son atelier de Montmartre, Camille photographie les rêves de ses modèles grâce à une chambre noire venue d'Orient, et ses clichés se vendent comme des cartes postales d'un pays que nul ne connaît. Les automobiles silencieuses croisent les fiacres sur les Champs-Élysées, et l'on dit que le cinématographe des frères Lumière montre parfois des scènes du lendemain.";

pub const ROARING_TWENTIES_STORY: &str = "Dans les caves enfumées de Saint-Germain, le jazz ne se joue plus seulement avec des instruments. Les musiciens du Bœuf sur le Toit ont appris à faire vibrer les verres de cristal et les néons au même tempo que la contrebasse. Louise, aviatrice et chroniqueuse, survole chaque nuit la Seine dans un biplan argenté pour écrire ses articles sous les étoiles. Les femmes ont obtenu le droit de vote dès 1920, et l'Assemblée siège parfois au bord de l'eau, entre deux concerts. Pourtant, quand l'horloge de la gare sonne minuit, certains jurent entendre un orchestre qui joue des airs que personne n'a encore composés.";

/// Canned narratives, one per catalog epoch, in catalog order.
pub static FALLBACK_STORIES: [(&str, &str); 5] = [
    ("Renaissance", RENAISSANCE_STORY),
    ("Révolution française", FRENCH_REVOLUTION_STORY),
    ("Révolution industrielle", INDUSTRIAL_REVOLUTION_STORY),
    ("Belle Époque", BELLE_EPOQUE_STORY),
    ("Années folles", ROARING_TWENTIES_STORY),
];

/// Canned story for an epoch, or the default epoch's story.
pub fn story_for_epoch(epoch: &Epoch) -> &'static str {
    story_by_bare_name(epoch.bare_name()).unwrap_or_else(default_story)
}

/// Picks the story of the first epoch whose bare name occurs in the prompt.
pub fn story_for_prompt(prompt: &str) -> &'static str {
    let haystack = prompt.to_lowercase();

    EPOCHS
        .iter()
        .map(Epoch::bare_name)
        .find(|name| haystack.contains(&name.to_lowercase()))
        .and_then(story_by_bare_name)
        .unwrap_or_else(default_story)
}

pub fn default_story() -> &'static str {
    story_by_bare_name(default_epoch().bare_name()).unwrap_or(RENAISSANCE_STORY)
}

fn story_by_bare_name(bare: &str) -> Option<&'static str> {
    FALLBACK_STORIES
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(bare))
        .map(|(_, story)| *story)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_every_epoch() {
        for epoch in &EPOCHS {
            assert!(story_by_bare_name(epoch.bare_name()).is_some(), "{}", epoch.name);
        }
        assert_eq!(FALLBACK_STORIES.len(), EPOCHS.len());
    }

    #[test]
    fn matches_epoch_name_inside_prompt() {
        let prompt = "Écris un court récit se déroulant pendant la BELLE ÉPOQUE";
        assert_eq!(story_for_prompt(prompt), BELLE_EPOQUE_STORY);
        assert_eq!(
            story_for_prompt("pendant Révolution industrielle, dans un monde parallèle"),
            INDUSTRIAL_REVOLUTION_STORY
        );
    }

    #[test]
    fn unknown_prompt_gets_default() {
        assert_eq!(story_for_prompt("Écris un récit sur Byzance"), RENAISSANCE_STORY);
        assert_eq!(story_for_prompt(""), RENAISSANCE_STORY);
    }
}
