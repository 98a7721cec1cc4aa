use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "moneta")]
#[command(about = "Local personal finance ledger", long_about = None)]
pub struct Cli {
    /// Override Moneta home directory (config/data subdirs will be created inside it).
    #[arg(long, env = "MONETA_HOME")]
    pub home: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Register(RegisterArgs),
    Login(LoginArgs),
    Logout,
    Whoami,

    Tx(TxArgs),

    Dashboard,
    Monthly(MonthlyArgs),
    Categories,
    Trends,
    Chart,

    Search(SearchArgs),

    Budget(BudgetArgs),
    Goal(GoalArgs),

    Notifications,
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    pub username: String,

    /// 4-digit PIN.
    #[arg(long)]
    pub pin: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    pub username: String,

    #[arg(long)]
    pub pin: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

#[derive(Debug, Args)]
pub struct TxArgs {
    #[command(subcommand)]
    pub cmd: TxCmd,
}

#[derive(Debug, Subcommand)]
pub enum TxCmd {
    /// Record an income or expense transaction.
    Add {
        kind: KindArg,
        amount: String,
        category: String,

        #[arg(long, short = 'm')]
        note: Option<String>,

        /// Calendar date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Numbered listing of every transaction, insertion order.
    List,
    /// Partial update of the transaction at the given list position.
    Edit {
        number: usize,

        #[arg(long)]
        kind: Option<KindArg>,

        #[arg(long)]
        amount: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        note: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        number: usize,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct MonthlyArgs {
    /// Month to report on (YYYY-MM).
    pub month: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(subcommand)]
    pub cmd: SearchCmd,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKeyArg {
    Date,
    Amount,
}

#[derive(Debug, Subcommand)]
pub enum SearchCmd {
    /// Transactions dated within an inclusive range (YYYY-MM-DD .. YYYY-MM-DD).
    Date { start: String, end: String },
    /// Case-insensitive exact category match.
    Category { category: String },
    /// Transactions with amount in an inclusive range.
    Amount { min: String, max: String },
    /// Stable re-ordering by date or amount.
    Sort {
        key: SortKeyArg,

        #[arg(long)]
        desc: bool,
    },
}

#[derive(Debug, Args)]
pub struct BudgetArgs {
    #[command(subcommand)]
    pub cmd: BudgetCmd,
}

#[derive(Debug, Subcommand)]
pub enum BudgetCmd {
    /// Set (or overwrite) the budget for a month.
    Set { month: String, amount: String },
    /// Spend against the month's budget.
    Status { month: String },
}

#[derive(Debug, Args)]
pub struct GoalArgs {
    #[command(subcommand)]
    pub cmd: GoalCmd,
}

#[derive(Debug, Subcommand)]
pub enum GoalCmd {
    Add {
        name: String,
        target: String,

        /// Optional deadline (YYYY-MM-DD).
        #[arg(long)]
        deadline: Option<String>,
    },
    List,
    /// Move money into a goal: records a Savings expense and bumps the goal.
    Allocate { number: usize, amount: String },
    Edit {
        number: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        target: Option<String>,

        #[arg(long)]
        deadline: Option<String>,
    },
    Delete {
        number: usize,

        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output path. Defaults to <data dir>/export/transactions_export.csv.
    #[arg(long)]
    pub out: Option<std::path::PathBuf>,
}
