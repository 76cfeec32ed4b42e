use crate::handlers;
use crate::models::{
    CpfUpdateRequest, EnderecoView, MessageResponse, PessoaRequest, PessoaView, PessoasListView,
};
use axum::{http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

/// OpenAPI document of the service.
#[derive(OpenApi)]
#[openapi(
    info(title = "API Cadastro de pessoas", version = "1.0.0"),
    paths(
        handlers::home,
        handlers::create_person,
        handlers::list_persons,
        handlers::get_person,
        handlers::update_cpf,
        handlers::update_person,
        handlers::delete_person,
        handlers::lookup_address,
    ),
    components(schemas(
        PessoaRequest,
        CpfUpdateRequest,
        PessoaView,
        PessoasListView,
        EnderecoView,
        MessageResponse,
    )),
    tags(
        (name = "Documentação", description = "Documentação da API com a ferramenta Swagger"),
        (name = "Pessoa", description = "Adição, visualização e remoção de pessoas da base. Dados pessoais, como nome, endereço e cpf")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document as JSON.
pub async fn serve_openapi_spec() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// The page loads the document served by `serve_openapi_spec`.
pub async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>API Cadastro de pessoas - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}
