use askama::Template;

use crate::bootstrap::PageProps;

/// The demo page. Everything interactive (installation list, repository
/// table, install popup) is driven by the inline script in the template.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub access_token: Option<String>,
    pub app_name: String,
    pub client_id: String,
    pub redirect_url: String,
}

impl From<PageProps> for IndexPage {
    fn from(props: PageProps) -> Self {
        Self {
            access_token: props.access_token,
            app_name: props.app_name,
            client_id: props.client_id,
            redirect_url: props.redirect_url,
        }
    }
}
