use axum::Router;
use tokio::net::TcpListener;

/// Nothing listens on the discard port, so connections are refused.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
