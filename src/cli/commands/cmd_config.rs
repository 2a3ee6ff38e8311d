use crate::config::Settings;

pub async fn execute(settings: &Settings) {
    settings.print_config();
}
