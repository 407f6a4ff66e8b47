pub const SINGLE_COMMAND_JSON: &str = include_str!("../../catalogs/single_command.json");
pub const CHAINED_JSON: &str = include_str!("../../catalogs/chained.json");
pub const NATURAL_LANGUAGE_JSON: &str = include_str!("../../catalogs/natural_language.json");
pub const TOOLS_JSON: &str = include_str!("../../catalogs/tools.json");
pub const VARIABLES_JSON: &str = include_str!("../../catalogs/variables.json");
