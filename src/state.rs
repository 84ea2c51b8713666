use crate::domain::alert::AlertService;

#[derive(Clone)]
pub struct AppState {
    pub alert_service: AlertService,
}
