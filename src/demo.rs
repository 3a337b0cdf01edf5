// src/demo.rs
//! Command-line entry points: the automated fast-forward walkthrough used
//! for demos, and offline rendering of a saved state blob.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::QuestionCatalog;
use crate::share;
use crate::store::SurveyStore;
use crate::summary::print_text;
use crate::wizard::{Wizard, WizardScreen};

#[derive(Parser)]
#[command(name = "minicoach")]
#[command(about = "Self-assessment wizard for job-search coaching")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server (default)
    Serve,
    /// Fast-forward through the whole questionnaire and print the bilan
    Walkthrough {
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Base url embedded in the printed share link
        #[arg(long, default_value = "http://localhost:8000")]
        base_url: String,
    },
    /// Render a saved state blob as the printable bilan
    Print { state: String },
}

const WALKTHROUGH_STEP_LIMIT: usize = 5000;

/// Drive a fresh wizard with fast-forward until every topic is answered.
/// The hub trigger jumps around at random, so the same run visits topics in
/// a different order every time unless seeded.
fn complete_walkthrough<R: Rng>(rng: &mut R) -> Result<Wizard> {
    let mut wizard = Wizard::with_automation(SurveyStore::new(), true);

    for _ in 0..WALKTHROUGH_STEP_LIMIT {
        match wizard.screen() {
            WizardScreen::Summary => {
                if wizard.store().all_topics_complete() {
                    return Ok(wizard);
                }
                wizard.go_home();
            }
            WizardScreen::Hub | WizardScreen::Question { .. } => {
                wizard.fast_forward(rng)?;
            }
        }
    }
    anyhow::bail!("Walkthrough did not finish within {WALKTHROUGH_STEP_LIMIT} steps")
}

pub fn run_walkthrough(seed: Option<u64>, base_url: &str) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let wizard = complete_walkthrough(&mut rng)?;
    let store = wizard.store();

    println!("{}", print_text(store.catalog(), store.state(), None));
    println!(
        "Lien de partage : {}",
        share::results_url(base_url, store.state())?
    );
    Ok(())
}

pub fn run_print(blob: &str) -> Result<()> {
    let state = share::deserialize_state(blob).context("Could not read this state blob")?;
    println!("{}", print_text(QuestionCatalog::get(), &state, None));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TopicId;

    #[test]
    fn test_walkthrough_completes_every_topic() {
        let mut rng = StdRng::seed_from_u64(7);
        let wizard = complete_walkthrough(&mut rng).unwrap();
        assert_eq!(wizard.screen(), WizardScreen::Summary);
        for topic in TopicId::ALL {
            assert!(wizard.store().is_topic_complete(topic));
        }
    }

    #[test]
    fn test_walkthrough_is_reproducible_with_a_seed() {
        let state_a = {
            let mut rng = StdRng::seed_from_u64(42);
            complete_walkthrough(&mut rng).unwrap().store().state().clone()
        };
        let state_b = {
            let mut rng = StdRng::seed_from_u64(42);
            complete_walkthrough(&mut rng).unwrap().store().state().clone()
        };
        assert_eq!(state_a, state_b);
    }
}
