pub struct DefaultsConfig {
    pub pseudo_type: &'static str,
    pub store_dirname: &'static str,
    pub config_filename: &'static str,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            pseudo_type: "pseudo",
            store_dirname: "store",
            config_filename: "config.toml",
        }
    }
}
