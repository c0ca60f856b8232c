//! End-to-end flow: a real PDF through extraction, a mocked completion API,
//! follow-up questions and the download file.

use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use expense_analyst::core::commands;
use expense_analyst::core::llm::OpenAIProvider;
use expense_analyst::core::pipeline::{AnalysisPipeline, PipelineError};
use expense_analyst::core::session::{Configuration, SessionState};
use expense_analyst::ingestion::PDFParser;

fn statement_pdf(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for line in lines {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-3.5-turbo",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 40, "completion_tokens": 10, "total_tokens": 50}
    })
}

fn pipeline_for(server: &MockServer) -> AnalysisPipeline {
    let provider =
        OpenAIProvider::new("sk-test".into(), None, None, Some(server.uri()), None).unwrap();
    AnalysisPipeline::new(Arc::new(provider), Arc::new(PDFParser::new()))
}

fn user_turn(request: &wiremock::Request) -> String {
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    body["messages"][1]["content"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_analysis_questions_and_download() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4o",
            "messages": [{"role": "system", "content": "SYS"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Total: R$ 2300")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Corte o mercado")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("gastos.pdf");
    std::fs::write(&pdf, statement_pdf(&["Aluguel 1500", "Mercado 800"])).unwrap();

    let pipeline = pipeline_for(&server);
    let mut session = SessionState::new(Configuration::new("gpt-4o", "SYS", "USR"));

    let outcome = commands::on_analyze_file(&mut session, &pipeline, &pdf)
        .await
        .unwrap();
    assert_eq!(outcome.page_count, 2);
    assert_eq!(session.analysis(), Some("Total: R$ 2300"));

    commands::on_ask(&mut session, &pipeline, "Onde economizar?")
        .await
        .unwrap();
    assert_eq!(session.qa_log().len(), 1);
    assert_eq!(session.qa_log()[0].answer, "Corte o mercado");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);

    let analysis_turn = user_turn(&requests[0]);
    assert!(analysis_turn.starts_with("USR\n\n"));
    let rent = analysis_turn.find("Aluguel 1500").unwrap();
    let groceries = analysis_turn.find("Mercado 800").unwrap();
    assert!(rent < groceries);

    assert_eq!(
        user_turn(&requests[1]),
        "Baseado na seguinte análise: Total: R$ 2300\n\nPergunta: Onde economizar?"
    );

    let payload = commands::on_download(&session).unwrap();
    let written = payload.write_to(&dir.path().join("out")).unwrap();
    assert_eq!(std::fs::read(written).unwrap(), b"Total: R$ 2300");
}

#[tokio::test]
async fn test_api_failure_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("gastos.pdf");
    std::fs::write(&pdf, statement_pdf(&["Aluguel 1500"])).unwrap();

    let pipeline = pipeline_for(&server);
    let mut session = SessionState::default();
    session.set_analysis("anterior");

    let err = commands::on_analyze_file(&mut session, &pipeline, &pdf)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Completion(_)));
    assert!(err.to_string().starts_with("Erro ao chamar a API"));
    assert_eq!(session.analysis(), Some("anterior"));
}

#[tokio::test]
async fn test_corrupt_pdf_never_reaches_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("broken.pdf");
    std::fs::write(&pdf, b"definitely not a pdf").unwrap();

    let pipeline = pipeline_for(&server);
    let mut session = SessionState::default();
    let err = commands::on_analyze_file(&mut session, &pipeline, &pdf)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Extraction(_)));
    assert!(session.analysis().is_none());
}
