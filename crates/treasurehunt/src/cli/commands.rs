//! CLI command definitions.

use clap::Args;

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// The hunt to add a treasure to
    pub hunt_id: String,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// The hunt to list
    pub hunt_id: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// View command arguments.
#[derive(Debug, Args)]
pub struct ViewCommand {
    /// The hunt to look in
    pub hunt_id: String,

    /// Id of the treasure to show
    pub treasure_id: i32,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Remove-treasure command arguments.
#[derive(Debug, Args)]
pub struct RemoveTreasureCommand {
    /// The hunt to remove from
    pub hunt_id: String,

    /// Id of the treasure to remove
    pub treasure_id: i32,
}

/// Remove-hunt command arguments.
#[derive(Debug, Args)]
pub struct RemoveHuntCommand {
    /// The hunt to remove
    pub hunt_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_debug() {
        let cmd = ListCommand {
            hunt_id: "forest".to_string(),
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("forest"));
    }
}
