use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pinboard_domain::{ConnectionColor, Endpoint};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "pinboard")]
#[command(about = "A visual pinboard of cards, groups and connections", long_about = None)]
#[command(version, long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")"))]
pub struct Cli {
    /// Path to the pinboard data file (or set PINBOARD_FILE env var)
    #[arg(long, short, global = true, value_name = "FILE", env = "PINBOARD_FILE")]
    pub file: Option<PathBuf>,

    /// Board to operate on (defaults to the first board)
    #[arg(long, global = true)]
    pub board: Option<Uuid>,

    /// Tab to operate on (defaults to the board's first tab)
    #[arg(long, global = true)]
    pub tab: Option<Uuid>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// Tab operations on the current board
    Tab(TabCommand),
    /// Card operations on the current tab
    Card(CardCommand),
    /// Group operations on the current tab
    Group(GroupCommand),
    /// Connection operations on the current tab
    Connection(ConnectionCommand),
    /// Stored image maintenance
    Image(ImageCommand),
    /// Show the current tab: viewport, groups, cards and connections
    Scene,
    /// Export the current board as CSV files into a directory
    Export(ExportArgs),
    /// Import a board from an exported directory
    Import(ImportArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board with one tab
    Create {
        #[arg(long)]
        name: String,
    },
    /// List all boards
    List,
    /// Rename the current board
    Rename {
        #[arg(long)]
        name: String,
    },
    /// Copy the current board and everything on it
    Duplicate,
    /// Delete a board and everything on it
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

// Tab commands
#[derive(Args)]
pub struct TabCommand {
    #[command(subcommand)]
    pub action: TabAction,
}

#[derive(Subcommand)]
pub enum TabAction {
    /// List tabs in display order
    List,
    /// Append a tab
    Add {
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename a tab
    Rename {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        name: String,
    },
    /// Delete a tab and everything on it
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Put tabs in the given order
    Reorder {
        #[arg(long, value_delimiter = ',')]
        ids: Vec<Uuid>,
    },
}

// Card commands
#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Create a card and place it on the current tab
    Add(CardAddArgs),
    /// List the board's card library
    List,
    /// Update a card's fields
    Update(CardUpdateArgs),
    /// Place an existing library card on the current tab
    Place {
        #[arg(long)]
        card_id: Uuid,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Move a placed card
    Move {
        #[arg(long)]
        placement_id: Uuid,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Take a card off the current tab, keeping it in the library
    Remove {
        #[arg(long)]
        placement_id: Uuid,
    },
    /// Delete a card from every tab and the library
    Delete {
        #[arg(long)]
        card_id: Uuid,
    },
    /// Set a card's photo from an image file
    SetImage {
        #[arg(long)]
        card_id: Uuid,
        #[arg(long)]
        path: PathBuf,
    },
}

#[derive(Args)]
pub struct CardAddArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Canvas position; the card is centered in the view when omitted
    #[arg(long, allow_negative_numbers = true, requires = "y")]
    pub x: Option<f64>,
    #[arg(long, allow_negative_numbers = true, requires = "x")]
    pub y: Option<f64>,
}

#[derive(Args)]
pub struct CardUpdateArgs {
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
}

// Group commands
#[derive(Args)]
pub struct GroupCommand {
    #[command(subcommand)]
    pub action: GroupAction,
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// Create a group; default size centered in the view unless bounds are given
    Create(GroupBoundsArgs),
    /// List groups on the current tab
    List,
    /// Change a group's label
    Rename {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        label: String,
    },
    /// Move a group and its member cards
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
    },
    /// Resize a group
    Resize {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },
    /// Delete a group, leaving its cards in place
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args)]
pub struct GroupBoundsArgs {
    #[arg(long, allow_negative_numbers = true, requires_all = ["y", "width", "height"])]
    pub x: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<f64>,
    /// Raised to the 100 minimum
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<f64>,
    /// Raised to the 80 minimum
    #[arg(long, allow_negative_numbers = true)]
    pub height: Option<f64>,
}

// Connection commands
#[derive(Args)]
pub struct ConnectionCommand {
    #[command(subcommand)]
    pub action: ConnectionAction,
}

#[derive(Subcommand)]
pub enum ConnectionAction {
    /// Connect two elements, each given as card:<placement-id> or group:<group-id>
    Create {
        #[arg(long)]
        from: Endpoint,
        #[arg(long)]
        to: Endpoint,
        #[arg(long)]
        label: Option<String>,
        #[arg(long, default_value_t = ConnectionColor::default())]
        color: ConnectionColor,
    },
    /// List connections on the current tab
    List,
    /// Change a connection's label or color
    Update {
        #[arg(long)]
        id: Uuid,
        #[arg(long, conflicts_with = "clear_label")]
        label: Option<String>,
        #[arg(long)]
        clear_label: bool,
        #[arg(long)]
        color: Option<ConnectionColor>,
    },
    /// Delete a connection
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

// Image commands
#[derive(Args)]
pub struct ImageCommand {
    #[command(subcommand)]
    pub action: ImageAction,
}

#[derive(Subcommand)]
pub enum ImageAction {
    /// List stored image hashes
    List,
    /// Delete an image no card uses
    Delete {
        #[arg(long)]
        hash: String,
    },
}

#[derive(Args)]
pub struct ExportArgs {
    /// Directory the export folder is created in
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Exported board directory
    #[arg(long)]
    pub dir: PathBuf,
}
