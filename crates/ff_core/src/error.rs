use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error("Invalid slot template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown team `{query}`. Choose from one of the following options --> {options:?}")]
    UnknownTeam { query: String, options: Vec<String> },

    #[error("Team name `{query}` matched multiple options: {matches:?}")]
    AmbiguousTeamName { query: String, matches: Vec<String> },

    #[error("`{asset}` is not a valid asset")]
    UnknownAsset { asset: String },

    #[error("Asset `{asset}` appears more than once on team `{team}`")]
    DuplicateAsset { asset: String, team: String },

    #[error("Asset `{asset}` is not owned by team `{team}`")]
    AssetNotOwned { asset: String, team: String },

    #[error("Only one of `{first}` and `{second}` can be passed")]
    ConfigConflict { first: &'static str, second: &'static str },

    #[error("No packages passed the send filter")]
    NoSendPackages,

    #[error("No opposing teams with trade candidates found")]
    NoOpposingTeams,

    #[error("No trades passed the package or receive filters")]
    NoCandidateTrades,

    #[error("No trades cleared the gain and fairness thresholds")]
    NoTradesCleared,

    #[error("{0} is set upon construction only")]
    ValueAlreadySet(&'static str),

    #[error("Trade between `{team1}` and `{team2}` was already executed")]
    AlreadyExecuted { team1: String, team2: String },

    #[error("Trade between `{team1}` and `{team2}` has not been executed")]
    NotExecuted { team1: String, team2: String },
}

impl TradeError {
    /// Empty-result outcomes of a pipeline stage, as opposed to invalid input.
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            TradeError::NoSendPackages
                | TradeError::NoOpposingTeams
                | TradeError::NoCandidateTrades
                | TradeError::NoTradesCleared
        )
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TradeError::InvalidTemplate(_)
                | TradeError::InvalidParameter(_)
                | TradeError::ConfigConflict { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TradeError>;
