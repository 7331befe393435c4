//! Stand-in search backend for trying the relay locally.
//!
//! Streams one NDJSON line per word of a canned answer, with a short pause
//! between lines, the way the real search service emits tokens.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::Query,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

async fn buscar(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let pregunta = params.get("pregunta").cloned().unwrap_or_default();
    let words: Vec<String> = format!("Recibí tu pregunta: «{}». Consulta el manual, sección 3.", pregunta)
        .split_inclusive(' ')
        .map(str::to_owned)
        .collect();

    let stream = futures_util::stream::unfold(words.into_iter(), |mut words| async move {
        let word = words.next()?;
        tokio::time::sleep(Duration::from_millis(120)).await;
        let line = serde_json::json!({ "respuesta": word }).to_string() + "\n";
        Some((Ok::<_, Infallible>(Bytes::from(line)), words))
    });

    ([(header::CONTENT_TYPE, "application/json")], Body::from_stream(stream))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let app = Router::new()
        .route("/", get(|| async { Json(serde_json::json!({ "status": "active", "service": "buscar_manual" })) }))
        .route("/buscar/", get(buscar));

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    println!("Mock search backend listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
