mod commands;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use casebook::{diagnostics, logging};

#[derive(Parser)]
#[command(name = "casebook", about = "Track a case study's sections and objectives against its markdown document")]
struct Cli {
    /// Config file to use instead of `.casebook.toml` in the current directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a case study from a template
    Init {
        /// Template to apply: `case-study` or `empty`.
        #[arg(long, default_value = "case-study")]
        template: String,
    },
    /// Show progress for every section, with ids
    Status,
    /// Show the next incomplete objective
    Next {
        /// List every incomplete objective instead of just the first.
        #[arg(long)]
        all: bool,
    },
    /// Add, edit, remove, or reorder sections
    Section {
        #[command(subcommand)]
        command: SectionCommand,
    },
    /// Add, edit, answer, or remove objectives
    Objective {
        #[command(subcommand)]
        command: ObjectiveCommand,
    },
    /// Add, edit, or remove deliverables
    Deliverable {
        #[command(subcommand)]
        command: DeliverableCommand,
    },
    /// Work with the case-study markdown document
    Doc {
        #[command(subcommand)]
        command: DocCommand,
    },
    /// Replace the headings an objective is linked to
    Link {
        /// Section id or name.
        section: String,
        /// Objective id or title.
        objective: String,
        /// Heading ids or texts. None clears the links.
        headings: Vec<String>,
    },
    /// List the headings linked to an objective
    Linked {
        /// Section id or name.
        section: String,
        /// Objective id or title.
        objective: String,
    },
    /// List the objectives linked to a heading
    HeadingLinks {
        /// Heading id or text.
        heading: String,
    },
    /// Write the full state as JSON (`-` for stdout)
    Export {
        /// Output file. Defaults to `casebook-YYYY-MM-DD.json`.
        path: Option<PathBuf>,
    },
    /// Replace the state with a previously exported JSON file
    Import {
        /// File to import.
        path: PathBuf,
    },
    /// Discard all state
    Reset,
    /// Re-sync the document whenever it changes
    Watch,
}

#[derive(Subcommand)]
enum SectionCommand {
    /// Append a section
    Add {
        /// Display name.
        name: String,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a section or change its description
    Update {
        /// Section id or name.
        section: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// Remove the description.
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
    },
    /// Remove a section with its objectives, deliverables, and links
    Delete {
        /// Section id or name.
        section: String,
    },
    /// Move sections, in the order given, to the front
    Move {
        /// Section ids or names.
        #[arg(required = true)]
        sections: Vec<String>,
    },
}

/// Objective variant chosen on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// A list of checkable items.
    Checklist,
    /// A bounded numeric answer.
    Number,
    /// A free-text answer.
    Text,
}

#[derive(Subcommand)]
enum ObjectiveCommand {
    /// Append an objective to a section
    Add {
        /// Section id or name.
        section: String,
        /// Display title.
        title: String,
        /// Objective type, fixed once created.
        #[arg(long, value_enum, default_value = "text")]
        kind: KindArg,
        /// Optional description.
        #[arg(long)]
        description: Option<String>,
        /// Text: maximum answer length in characters.
        #[arg(long)]
        max_length: Option<usize>,
        /// Number: inclusive lower bound.
        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,
        /// Number: inclusive upper bound.
        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,
        /// Number: input increment.
        #[arg(long)]
        step: Option<f64>,
        /// Checklist: an item label (repeatable).
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Change an objective's title, description, or type settings
    Update {
        /// Section id or name.
        section: String,
        /// Objective id or title.
        objective: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// Remove the description.
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        /// Text: new maximum answer length.
        #[arg(long)]
        max_length: Option<usize>,
        /// Number: new lower bound.
        #[arg(long, allow_negative_numbers = true)]
        min: Option<f64>,
        /// Number: new upper bound.
        #[arg(long, allow_negative_numbers = true)]
        max: Option<f64>,
        /// Number: new input increment.
        #[arg(long)]
        step: Option<f64>,
        /// Checklist: append an item (repeatable).
        #[arg(long = "add-item")]
        add_items: Vec<String>,
    },
    /// Answer a text or number objective
    Set {
        /// Section id or name.
        section: String,
        /// Objective id or title.
        objective: String,
        /// The answer.
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Tick or untick a checklist item
    Check {
        /// Section id or name.
        section: String,
        /// Objective id or title.
        objective: String,
        /// Item id or label.
        item: String,
    },
    /// Flip an objective between complete and incomplete
    Toggle {
        /// Section id or name.
        section: String,
        /// Objective id or title.
        objective: String,
    },
    /// Remove an objective and its heading links
    Delete {
        /// Section id or name.
        section: String,
        /// Objective id or title.
        objective: String,
    },
}

#[derive(Subcommand)]
enum DeliverableCommand {
    /// Append a deliverable to a section
    Add {
        /// Section id or name.
        section: String,
        /// Display label.
        label: String,
        /// Optional note.
        #[arg(long)]
        note: Option<String>,
    },
    /// Change a deliverable's label or note
    Update {
        /// Section id or name.
        section: String,
        /// Deliverable id or label.
        deliverable: String,
        /// New label.
        #[arg(long)]
        label: Option<String>,
        /// New note.
        #[arg(long)]
        note: Option<String>,
        /// Remove the note.
        #[arg(long, conflicts_with = "note")]
        clear_note: bool,
    },
    /// Flip a deliverable between complete and incomplete
    Toggle {
        /// Section id or name.
        section: String,
        /// Deliverable id or label.
        deliverable: String,
    },
    /// Remove a deliverable
    Delete {
        /// Section id or name.
        section: String,
        /// Deliverable id or label.
        deliverable: String,
    },
}

#[derive(Subcommand)]
enum DocCommand {
    /// Give every heading an id marker and store the document
    Sync {
        /// Document to read instead of the configured one.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List the stored headings with their ids
    Headings,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    return match run(cli) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Dispatch a parsed command line to its handler.
///
/// # Errors
///
/// Returns whatever the handler returns.
fn run(cli: Cli) -> Result<ExitCode, casebook::Error> {
    let mut session = commands::Session::open(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { template } => return commands::init(&mut session, &template),
        Commands::Status => commands::status(&session),
        Commands::Next { all } => commands::next(&session, all),
        Commands::Section { command } => run_section(&mut session, command)?,
        Commands::Objective { command } => run_objective(&mut session, command)?,
        Commands::Deliverable { command } => run_deliverable(&mut session, command)?,
        Commands::Doc { command: DocCommand::Sync { file } } => commands::doc_sync(&mut session, file.as_deref())?,
        Commands::Doc { command: DocCommand::Headings } => commands::doc_headings(&session),
        Commands::Link { section, objective, headings } => {
            commands::link(&mut session, &section, &objective, &headings)?;
        },
        Commands::Linked { section, objective } => commands::linked(&session, &section, &objective)?,
        Commands::HeadingLinks { heading } => commands::heading_links(&session, &heading)?,
        Commands::Export { path } => commands::export(&session, path.as_deref())?,
        Commands::Import { path } => commands::import(&mut session, &path)?,
        Commands::Reset => commands::reset(&mut session)?,
        Commands::Watch => return watch::run(session),
    }

    return Ok(ExitCode::SUCCESS);
}

/// # Errors
///
/// Returns id-resolution or persistence errors.
fn run_section(session: &mut commands::Session, command: SectionCommand) -> Result<(), casebook::Error> {
    return match command {
        SectionCommand::Add { name, description } => commands::section_add(session, &name, description),
        SectionCommand::Update { section, name, description, clear_description } => {
            let description = if clear_description { Some(None) } else { description.map(Some) };
            commands::section_update(session, &section, name, description)
        },
        SectionCommand::Delete { section } => commands::section_delete(session, &section),
        SectionCommand::Move { sections } => commands::section_move(session, &sections),
    };
}

/// # Errors
///
/// Returns id-resolution, value, or persistence errors.
fn run_objective(session: &mut commands::Session, command: ObjectiveCommand) -> Result<(), casebook::Error> {
    return match command {
        ObjectiveCommand::Add { section, title, kind, description, max_length, min, max, step, items } => {
            let kind = match kind {
                KindArg::Checklist => commands::NewKind::Checklist(items),
                KindArg::Number => commands::NewKind::Number { max, min, step },
                KindArg::Text => commands::NewKind::Text { max_length },
            };
            commands::objective_add(session, &section, &title, description, kind)
        },
        ObjectiveCommand::Update {
            section,
            objective,
            title,
            description,
            clear_description,
            max_length,
            min,
            max,
            step,
            add_items,
        } => {
            let edit = commands::ObjectiveEdit {
                add_items,
                description: if clear_description { Some(None) } else { description.map(Some) },
                max,
                max_length,
                min,
                step,
                title,
            };
            commands::objective_update(session, &section, &objective, edit)
        },
        ObjectiveCommand::Set { section, objective, value } => {
            commands::objective_set(session, &section, &objective, &value)
        },
        ObjectiveCommand::Check { section, objective, item } => {
            commands::objective_check(session, &section, &objective, &item)
        },
        ObjectiveCommand::Toggle { section, objective } => commands::objective_toggle(session, &section, &objective),
        ObjectiveCommand::Delete { section, objective } => commands::objective_delete(session, &section, &objective),
    };
}

/// # Errors
///
/// Returns id-resolution or persistence errors.
fn run_deliverable(session: &mut commands::Session, command: DeliverableCommand) -> Result<(), casebook::Error> {
    return match command {
        DeliverableCommand::Add { section, label, note } => commands::deliverable_add(session, &section, &label, note),
        DeliverableCommand::Update { section, deliverable, label, note, clear_note } => {
            let note = if clear_note { Some(None) } else { note.map(Some) };
            commands::deliverable_update(session, &section, &deliverable, label, note)
        },
        DeliverableCommand::Toggle { section, deliverable } => {
            commands::deliverable_toggle(session, &section, &deliverable)
        },
        DeliverableCommand::Delete { section, deliverable } => {
            commands::deliverable_delete(session, &section, &deliverable)
        },
    };
}
