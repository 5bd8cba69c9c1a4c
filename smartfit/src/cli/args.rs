//! CLI argument definitions
//!
//! Contains the main CLI struct and Commands enum for clap parsing.

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use smartfit::{ClothingStyle, Gender};

#[derive(Parser)]
#[command(name = "smartfit")]
#[command(about = "Seasonal color analysis and outfit recommendations from a face photo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: $SMARTFIT_CONFIG_PATH or ~/.smartfit/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyse a cropped face photo
    Scan {
        /// Cropped image to upload
        image: PathBuf,
        /// User id (default: from config, else unknown_user)
        #[arg(long, env = "SMARTFIT_USER_ID")]
        user: Option<String>,
        /// Ask for recommendations for this gender
        #[arg(long, value_enum)]
        gender: Option<Gender>,
        /// Clothing style to recommend
        #[arg(long, value_enum)]
        style: Option<ClothingStyle>,
        /// Raw clothing type tag, e.g. "formal-men"
        #[arg(long, conflicts_with_all = ["gender", "style"])]
        clothing_type: Option<String>,
    },
    /// List stored predictions, most recent first
    History {
        #[arg(long, env = "SMARTFIT_USER_ID")]
        user: Option<String>,
    },
    /// Show one stored prediction
    Detail {
        /// Prediction key from `history`
        key: String,
        #[arg(long, env = "SMARTFIT_USER_ID")]
        user: Option<String>,
    },
    /// Delete one stored prediction
    Delete {
        /// Prediction key from `history`
        key: String,
        #[arg(long, env = "SMARTFIT_USER_ID")]
        user: Option<String>,
    },
    /// Search fashion news
    News {
        /// Search terms (default: from config)
        #[arg(long, short)]
        query: Option<String>,
        /// Oldest publish date, YYYY-MM-DD
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Newest publish date, YYYY-MM-DD
        #[arg(long)]
        to: Option<NaiveDate>,
        /// relevance, popularity or publishedAt
        #[arg(long)]
        sort_by: Option<String>,
    },
}
