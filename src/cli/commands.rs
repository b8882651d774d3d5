use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Manage stored remote API credentials
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Fetch repository information from the remote service
    Info {
        /// Repository identifier
        repo_id: String,
    },

    /// Create a repository with an explicit id, without binding a project
    Create {
        /// Proposed repository identifier
        repo_id: String,
        /// Project identifier to record on the remote
        project_id: String,
        /// Creator, e.g. "Full Name <email>"
        creator: String,
    },

    /// Delete a repository. This cannot be undone via the API
    Delete {
        /// Repository identifier
        repo_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Grant a user access to a repository
    Grant {
        /// Repository identifier
        repo_id: String,
        /// Remote-service username
        username: String,
        /// Plaintext password, hashed locally before sending
        password: String,
    },

    /// Revoke a user's access to a repository
    Revoke {
        /// Repository identifier
        repo_id: String,
        /// Remote-service username
        username: String,
    },

    /// Manage local project bindings
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store remote API URL and credentials
    Login {
        /// Base URL of the remote API, e.g. "https://repo.example.com/api/"
        #[arg(long)]
        api_url: String,

        /// Basic auth username; leave empty with an empty password to send
        /// unauthenticated requests
        #[arg(long, default_value = "")]
        username: String,

        /// Basic auth password
        #[arg(long, default_value = "")]
        password: String,
    },

    /// Remove stored credentials
    Logout,
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Initialize the local binding database
    Init {
        /// Data directory for the binding database
        #[arg(long, default_value = "./data")]
        data_dir: String,
    },

    /// Register a project without a repository
    Add {
        /// Data directory for the binding database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Project identifier
        project_id: String,
    },

    /// Register a directory user for grant lookups
    UserAdd {
        /// Data directory for the binding database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// External user identifier
        user_id: String,

        /// Remote-service username
        username: String,

        /// Capability to attach, repeatable
        #[arg(long = "cap")]
        capabilities: Vec<String>,
    },

    /// Provision a repository for a project
    Provision {
        /// Data directory for the binding database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Project identifier
        project_id: String,

        /// Creator, e.g. "Full Name <email>"
        creator: String,
    },

    /// Grant a directory user access to a project's repository
    Grant {
        /// Data directory for the binding database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Project identifier
        project_id: String,

        /// Bound repository identifier, verified before anything is sent
        repo_id: String,

        /// External user identifier
        user_id: String,

        /// Plaintext password; omit to create the account without one
        #[arg(long)]
        password: Option<String>,
    },

    /// Revoke a directory user's access from a project's repository
    Revoke {
        /// Data directory for the binding database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Project identifier
        project_id: String,

        /// Bound repository identifier, verified before anything is sent
        repo_id: String,

        /// External user identifier
        user_id: String,
    },

    /// Delete a project's repository and clear its binding
    Delete {
        /// Data directory for the binding database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Project identifier
        project_id: String,

        /// Bound repository identifier, verified before anything is sent
        repo_id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
