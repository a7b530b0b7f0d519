use std::sync::Arc;

use crate::app::RunSettings;
use crate::http::RequestTemplate;
use crate::source::RequestSource;

pub(crate) struct RunPlan {
    pub(crate) source: Box<dyn RequestSource>,
    pub(crate) template: Arc<RequestTemplate>,
    pub(crate) settings: RunSettings,
}
