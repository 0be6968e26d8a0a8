use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use onrecord_common::{
    types::AttestationUid,
    view::error_html,
    BeliefReader, ContractReader, FetchError,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// Shared by every request
pub struct AppState<R> {
    pub reader: BeliefReader<R>,
    pub uid: AttestationUid,
}

pub fn routes<R: ContractReader + 'static>(state: Arc<AppState<R>>) -> Router {
    Router::new()
        .route("/", get(index::<R>))
        .with_state(state)
}

pub async fn run<R: ContractReader + 'static>(state: AppState<R>, port: u16) -> anyhow::Result<()> {
    let app = routes(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Serving belief page on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// One fresh load per page view
async fn index<R: ContractReader>(State(state): State<Arc<AppState<R>>>) -> (StatusCode, Html<String>) {
    match state.reader.load_belief(state.uid).await {
        Ok(view) => (StatusCode::OK, Html(view.to_html())),
        Err(e) => {
            error!("Error fetching belief: {}", e);
            (status_for(&e), Html(error_html(&e)))
        }
    }
}

fn status_for(err: &FetchError) -> StatusCode {
    match err {
        FetchError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}
