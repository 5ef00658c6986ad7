//! Command-line interface for coursemap.
//!
//! The CLI is a thin caller over [`ContentRepository`]: each
//! subcommand maps to one store operation and the returned entity (or
//! fault) is serialized as pretty JSON on stdout.

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::config;
use crate::core::{ContentRepository, NewTopic, TopicPatch};
use crate::domain::Priority;
use crate::ledger::GitLedger;

/// coursemap - Git-backed learning content store
#[derive(Parser, Debug)]
#[command(name = "coursemap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all courses
    List,

    /// Create a new course
    CreateCourse {
        /// Short course code (e.g. "CS101")
        code: String,

        /// Human-readable course name
        name: String,
    },

    /// Show a course with recomputed progress
    Show {
        /// Course id
        course_id: u32,
    },

    /// Add a module to a course
    AddModule {
        /// Course id
        course_id: u32,

        /// Module title
        title: String,
    },

    /// Add a topic to a module
    AddTopic {
        /// Course id
        course_id: u32,

        /// Module id
        module_id: u32,

        /// Topic title
        title: String,

        /// Study priority
        #[arg(short, long, value_enum, default_value = "medium")]
        priority: PriorityArg,

        /// Estimated study time in minutes
        #[arg(short, long, default_value = "15")]
        time: u32,
    },

    /// Show a topic with its content body
    Topic {
        /// Course id
        course_id: u32,

        /// Module id
        module_id: u32,

        /// Topic id
        topic_id: u32,
    },

    /// Update a topic's content and/or completion flag
    UpdateTopic {
        /// Course id
        course_id: u32,

        /// Module id
        module_id: u32,

        /// Topic id
        topic_id: u32,

        /// Read the new content body from a file
        #[arg(long)]
        content_file: Option<PathBuf>,

        /// Read the new content body from stdin
        #[arg(long)]
        stdin: bool,

        /// Set the completion flag
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Search across courses, modules, and topic content
    Search {
        /// Search query
        query: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Priority for CLI (maps to Priority)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    /// Low priority
    Low,

    /// Default priority
    Medium,

    /// High priority
    High,
}

impl From<PriorityArg> for Priority {
    fn from(p: PriorityArg) -> Self {
        match p {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::List => {
                let repo = open_repository().await?;
                print_json(&repo.list_courses().await?)
            }
            Commands::CreateCourse { code, name } => {
                let repo = open_repository().await?;
                print_json(&repo.create_course(&code, &name).await?)
            }
            Commands::Show { course_id } => {
                let repo = open_repository().await?;
                print_json(&repo.get_course(course_id).await?)
            }
            Commands::AddModule { course_id, title } => {
                let repo = open_repository().await?;
                print_json(&repo.create_module(course_id, &title).await?)
            }
            Commands::AddTopic {
                course_id,
                module_id,
                title,
                priority,
                time,
            } => {
                let repo = open_repository().await?;
                let spec = NewTopic::new(title)
                    .with_priority(priority.into())
                    .with_time(time);
                print_json(&repo.create_topic(course_id, module_id, spec).await?)
            }
            Commands::Topic {
                course_id,
                module_id,
                topic_id,
            } => {
                let repo = open_repository().await?;
                print_json(&repo.get_topic(course_id, module_id, topic_id).await?)
            }
            Commands::UpdateTopic {
                course_id,
                module_id,
                topic_id,
                content_file,
                stdin,
                completed,
            } => {
                let content = read_content(content_file, stdin)?;
                let patch = TopicPatch { content, completed };

                let repo = open_repository().await?;
                print_json(
                    &repo
                        .update_topic(course_id, module_id, topic_id, patch)
                        .await?,
                )
            }
            Commands::Search { query } => {
                let repo = open_repository().await?;
                print_json(&repo.search(&query).await?)
            }
            Commands::Config => {
                let config = config::config()?;
                println!("root: {}", config.root.display());
                println!("git user: {} <{}>", config.git.user_name, config.git.user_email);
                match &config.config_file {
                    Some(path) => println!("config file: {}", path.display()),
                    None => println!("config file: (none)"),
                }
                Ok(())
            }
        }
    }
}

/// Open the repository at the configured content root, with the
/// configured committer identity on the git ledger
async fn open_repository() -> Result<ContentRepository> {
    let config = config::config()?;

    let ledger = GitLedger::new(&config.root)
        .with_identity(config.git.user_name.clone(), config.git.user_email.clone());
    ledger.init().await?;

    ContentRepository::with_ledger(&config.root, Box::new(ledger))
        .await
        .with_context(|| format!("Failed to open content root: {}", config.root.display()))
}

/// Resolve the content body for an update from a file or stdin
fn read_content(content_file: Option<PathBuf>, use_stdin: bool) -> Result<Option<String>> {
    if let Some(path) = content_file {
        let body = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read content file: {}", path.display()))?;
        return Ok(Some(body));
    }

    if use_stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read content from stdin")?;
        return Ok(Some(buffer));
    }

    Ok(None)
}

/// Print an entity as pretty JSON
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
