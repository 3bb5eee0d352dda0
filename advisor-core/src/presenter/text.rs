//! Plain-text rendering of a [`BuildView`] for terminal front-ends

use std::fmt;

use super::{BuildView, HeroCard, PickCard};

impl fmt::Display for BuildView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.engine_label, self.title)?;

        let mut meta = self.badges.clone();
        if let Some(badge) = &self.synergy_badge {
            meta.push(format!("Synergy: {}", badge));
        }
        writeln!(f, "  {}", meta.join(" | "))?;
        writeln!(f, "  {}", self.summary)?;

        if let Some(narrative) = &self.synergy_narrative {
            writeln!(f)?;
            writeln!(f, "Synergy Analysis")?;
            writeln!(f, "  {}", narrative)?;
        }

        write_section(f, "Recommended Skills", &self.skill_cards)?;
        write_section(f, "Recommended Items", &self.item_cards)?;
        if let Some(talents) = &self.talent_cards {
            write_section(f, "Recommended Talent Nodes", talents)?;
        }

        if !self.tips.is_empty() {
            writeln!(f)?;
            writeln!(f, "Playstyle Tips")?;
            for tip in &self.tips {
                writeln!(f, "  - {}", tip)?;
            }
        }

        if let Some(usage) = &self.usage_line {
            writeln!(f)?;
            writeln!(f, "{}", usage)?;
        }
        Ok(())
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, heading: &str, cards: &[PickCard]) -> fmt::Result {
    if cards.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{}", heading)?;
    for card in cards {
        write!(f, "  {:<4}{}", card.rank_label, card.title)?;
        if !card.details.is_empty() {
            write!(f, "  ({})", card.details.join(", "))?;
        }
        if !card.tags.is_empty() {
            let tags: Vec<_> = card.tags.iter().map(|t| t.label()).collect();
            write!(f, "  [{}]", tags.join("] ["))?;
        }
        writeln!(f)?;
        if let Some(set) = &card.set_name {
            writeln!(f, "      Set: {}", set)?;
        }
        if let Some(reason) = &card.reason {
            writeln!(f, "      Why: {}", reason)?;
        }
        match (&card.score_line, &card.priority_line) {
            (Some(score), _) => writeln!(f, "      {}", score)?,
            (None, Some(priority)) => writeln!(f, "      {}", priority)?,
            (None, None) => {}
        }
    }
    Ok(())
}

impl fmt::Display for HeroCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.selected { "*" } else { " " };
        write!(
            f,
            "{} {:>4}  {:<20} {:<24} {}",
            marker, self.id, self.name, self.talent, self.god_type
        )
    }
}
