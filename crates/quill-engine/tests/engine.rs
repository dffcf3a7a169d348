use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use quill_bedrock::{BedrockError, ContentGeneratorAdapter, GenerationBackend};
use quill_core::TemplateRegistry;
use quill_core::capability::{BoxFuture, ContentGenerator, Transcriber};
use quill_core::error::{GenerationError, TranscriptionError};
use quill_core::models::document::{Document, DocumentId};
use quill_core::models::field::FieldValue;
use quill_core::models::preview::RenderMode;
use quill_core::models::proposal::RevisionProposal;
use quill_core::models::template::TemplateId;
use quill_core::models::transcription::{AudioFormat, Transcription};
use quill_engine::{
    EngineConfig, EngineErrorKind, ErrorClass, RevisionEngine, StateKind,
};
use quill_export::{BackendError, ExportError, PdfBackend, PdfEmitter};
use tokio::sync::Semaphore;

/// Stands in for the model: the first call opens an event, later calls
/// interpret a few fixed instructions.
#[derive(Default)]
struct FakeGenerator {
    seen: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn instructions(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl ContentGenerator for FakeGenerator {
    fn propose<'a>(
        &'a self,
        instruction: &'a str,
        current: Option<&'a Document>,
    ) -> BoxFuture<'a, Result<RevisionProposal, GenerationError>> {
        self.seen.lock().unwrap().push(instruction.to_string());
        Box::pin(async move {
            let instruction = instruction.trim();
            if current.is_none() {
                let mut proposal = RevisionProposal::new()
                    .with_template_change(TemplateId::new("event"))
                    .with_field("title", FieldValue::text("Summer Party"))
                    .with_rationale("party invitation");
                if instruction.contains("July 12th") {
                    proposal = proposal
                        .with_field("date", FieldValue::text("July 12"))
                        .with_field("time", FieldValue::text("5pm"));
                }
                return Ok(proposal);
            }

            match instruction {
                "" | "asdf qwer" => Err(GenerationError::Rejected(
                    "instruction is unintelligible".to_string(),
                )),
                "make the title bigger" => {
                    Ok(RevisionProposal::new().with_style("titleFontSize", "32px"))
                }
                "add a footer" => Ok(RevisionProposal::new()
                    .with_field("footer", FieldValue::text("Thanks for coming"))),
                "clear the date" => {
                    Ok(RevisionProposal::new().with_field("date", FieldValue::text("")))
                }
                "hang" => std::future::pending().await,
                "upstream down" => Err(GenerationError::Unavailable("timeout".to_string())),
                other => Ok(RevisionProposal::new()
                    .with_field("description", FieldValue::text(other))),
            }
        })
    }
}

/// Counts conversions and answers with a minimal PDF.
#[derive(Default)]
struct CountingBackend {
    calls: AtomicUsize,
}

impl CountingBackend {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PdfBackend for CountingBackend {
    fn convert<'a>(&'a self, _html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, BackendError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(b"%PDF-1.7\n%fake".to_vec()) })
    }
}

struct FixedTranscriber(&'static str);

impl Transcriber for FixedTranscriber {
    fn transcribe<'a>(
        &'a self,
        _audio: &'a [u8],
        _format: AudioFormat,
    ) -> BoxFuture<'a, Result<Transcription, TranscriptionError>> {
        let text = self.0.to_string();
        Box::pin(async move {
            Ok(Transcription {
                text,
                confidence: 0.93,
                language: "en-US".to_string(),
            })
        })
    }
}

struct Harness {
    engine: Arc<RevisionEngine>,
    generator: Arc<FakeGenerator>,
    backend: Arc<CountingBackend>,
}

fn harness() -> Harness {
    harness_with(EngineConfig::default(), None)
}

fn harness_with(config: EngineConfig, transcriber: Option<Arc<dyn Transcriber>>) -> Harness {
    let registry = Arc::new(TemplateRegistry::with_builtin().unwrap());
    let generator = Arc::new(FakeGenerator::default());
    let backend = Arc::new(CountingBackend::default());
    let emitter = PdfEmitter::new(backend.clone());

    let mut engine = RevisionEngine::new(registry, generator.clone(), emitter, config);
    if let Some(transcriber) = transcriber {
        engine = engine.with_transcriber(transcriber);
    }
    Harness {
        engine: Arc::new(engine),
        generator,
        backend,
    }
}

const PARTY: &str = "come to our summer party July 12th at 5pm";

#[tokio::test]
async fn instruction_creates_version_one() {
    let h = harness();
    let outcome = h.engine.create_document(PARTY).await.unwrap();

    assert_eq!(outcome.version, 1);
    assert_eq!(outcome.template_id, TemplateId::new("event"));
    assert!(outcome.preview.html.contains("Summer Party"));
    assert!(outcome.preview.html.contains("July 12"));

    let (document, state) = h.engine.get_document(outcome.document_id).await.unwrap();
    assert_eq!(state, StateKind::PreviewReady);
    assert_eq!(document.version(), 1);
    assert!(document.history().is_empty());
    assert_eq!(document.instruction(), PARTY);
}

#[tokio::test]
async fn style_revision_leaves_fields_alone() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;
    let (before, _) = h.engine.get_document(id).await.unwrap();

    let outcome = h
        .engine
        .revise_document(id, "make the title bigger")
        .await
        .unwrap();
    assert_eq!(outcome.version, 2);
    assert!(outcome.preview.css.contains("font-size: 32px"));

    let (after, _) = h.engine.get_document(id).await.unwrap();
    assert_eq!(after.fields(), before.fields());
    assert_eq!(
        after.style_overrides().get("titleFontSize").map(String::as_str),
        Some("32px")
    );
    assert_eq!(after.history().len(), 1);
    assert_eq!(after.history()[0].version, 1);
}

#[tokio::test]
async fn rejected_instruction_keeps_version() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;

    let err = h.engine.revise_document(id, "asdf qwer").await.unwrap_err();
    assert!(matches!(
        &err.kind,
        EngineErrorKind::Generation(GenerationError::Rejected(reason))
            if reason.contains("unintelligible")
    ));
    assert_eq!(err.class(), ErrorClass::Semantic);
    assert!(!err.is_retryable());
    assert_eq!(err.current_version, Some(1));

    let (document, state) = h.engine.get_document(id).await.unwrap();
    assert_eq!(document.version(), 1);
    assert_eq!(state, StateKind::PreviewReady);
}

#[tokio::test]
async fn upstream_outage_is_retryable() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;

    let err = h.engine.revise_document(id, "upstream down").await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.current_version, Some(1));
}

#[tokio::test]
async fn incomplete_document_is_not_emitted() {
    let h = harness();
    let id = h
        .engine
        .create_document("come to our summer party")
        .await
        .unwrap()
        .document_id;

    let err = h.engine.finalize_document(id).await.unwrap_err();
    match &err.kind {
        EngineErrorKind::IncompleteDocument { missing } => {
            assert_eq!(missing, &vec!["date".to_string()]);
        }
        other => panic!("expected IncompleteDocument, got {other:?}"),
    }
    assert_eq!(err.class(), ErrorClass::Input);
    assert_eq!(h.backend.calls(), 0);
    assert_eq!(
        h.engine.document_state(id).await.unwrap(),
        StateKind::PreviewReady
    );
}

/// Holds every revision at a gate until the test opens it, recording the
/// order requests reach the generator and how many are inside at once.
struct GatedGenerator {
    gate: Semaphore,
    entered: Mutex<Vec<String>>,
    inside: AtomicUsize,
    most_inside: AtomicUsize,
}

impl GatedGenerator {
    fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
            entered: Mutex::new(Vec::new()),
            inside: AtomicUsize::new(0),
            most_inside: AtomicUsize::new(0),
        }
    }

    fn entered(&self) -> Vec<String> {
        self.entered.lock().unwrap().clone()
    }
}

impl ContentGenerator for GatedGenerator {
    fn propose<'a>(
        &'a self,
        instruction: &'a str,
        current: Option<&'a Document>,
    ) -> BoxFuture<'a, Result<RevisionProposal, GenerationError>> {
        Box::pin(async move {
            if current.is_none() {
                return Ok(RevisionProposal::new()
                    .with_template_change(TemplateId::new("event"))
                    .with_field("title", FieldValue::text("Summer Party"))
                    .with_field("date", FieldValue::text("July 12")));
            }

            self.entered.lock().unwrap().push(instruction.to_string());
            let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
            self.most_inside.fetch_max(now, Ordering::SeqCst);
            let permit = self.gate.acquire().await.unwrap();
            drop(permit);
            self.inside.fetch_sub(1, Ordering::SeqCst);

            Ok(RevisionProposal::new().with_field("description", FieldValue::text(instruction)))
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_revisions_apply_in_arrival_order() {
    let registry = Arc::new(TemplateRegistry::with_builtin().unwrap());
    let generator = Arc::new(GatedGenerator::closed());
    let engine = Arc::new(RevisionEngine::new(
        registry,
        generator.clone(),
        PdfEmitter::new(Arc::new(CountingBackend::default())),
        EngineConfig::default(),
    ));
    let id = engine.create_document(PARTY).await.unwrap().document_id;

    let mut tasks = Vec::new();
    for i in 0..8 {
        let engine = engine.clone();
        tasks.push(tokio::spawn(async move {
            engine.revise_document(id, &format!("note {i}")).await
        }));
        // Spaced out so each request queues on the document lock in turn.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    // The first request holds the lock at the gate; the other seven wait.
    assert_eq!(generator.entered(), vec!["note 0".to_string()]);
    assert!(tasks.iter().all(|task| !task.is_finished()));

    generator.gate.add_permits(8);

    let mut versions = Vec::new();
    for task in tasks {
        versions.push(task.await.unwrap().unwrap().version);
    }
    assert_eq!(versions, (2..=9).collect::<Vec<u32>>());
    assert_eq!(generator.most_inside.load(Ordering::SeqCst), 1);

    let expected: Vec<String> = (0..8).map(|i| format!("note {i}")).collect();
    assert_eq!(generator.entered(), expected);

    let (document, _) = engine.get_document(id).await.unwrap();
    assert_eq!(document.version(), 9);
    let history: Vec<u32> = document.history().iter().map(|s| s.version).collect();
    assert_eq!(history, (1..=8).collect::<Vec<u32>>());
    assert_eq!(
        document.field("description"),
        Some(&FieldValue::text("note 7"))
    );
}

#[tokio::test]
async fn unknown_slot_rejects_whole_proposal() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;

    let err = h.engine.revise_document(id, "add a footer").await.unwrap_err();
    assert!(matches!(err.kind, EngineErrorKind::Core(_)));
    assert_eq!(err.class(), ErrorClass::Input);
    assert_eq!(err.current_version, Some(1));

    let (document, _) = h.engine.get_document(id).await.unwrap();
    assert_eq!(document.version(), 1);
    assert!(document.field("footer").is_none());
}

#[tokio::test]
async fn cancelled_revision_leaves_document_untouched() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;

    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), h.engine.revise_document(id, "hang")).await;
    assert!(timed_out.is_err());

    let (document, state) = h.engine.get_document(id).await.unwrap();
    assert_eq!(document.version(), 1);
    assert_eq!(state, StateKind::PreviewReady);

    let outcome = h
        .engine
        .revise_document(id, "make the title bigger")
        .await
        .unwrap();
    assert_eq!(outcome.version, 2);
}

#[tokio::test]
async fn finalize_emits_once_and_locks_document() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;

    let artifact = h.engine.finalize_document(id).await.unwrap();
    assert!(artifact.bytes.starts_with(b"%PDF-"));
    assert_eq!(artifact.version, 1);
    assert!(artifact.suggested_key.starts_with("event/"));
    assert!(artifact.suggested_key.ends_with(&artifact.filename));
    assert!(artifact.filename.starts_with("Summer_Party_"));
    assert!(artifact.filename.ends_with(".pdf"));
    assert_eq!(h.backend.calls(), 1);
    assert_eq!(h.engine.document_state(id).await.unwrap(), StateKind::Finalized);

    let err = h
        .engine
        .revise_document(id, "make the title bigger")
        .await
        .unwrap_err();
    assert!(matches!(err.kind, EngineErrorKind::DocumentFinalized(d) if d == id));

    let err = h.engine.finalize_document(id).await.unwrap_err();
    assert!(matches!(err.kind, EngineErrorKind::DocumentFinalized(_)));
    assert_eq!(h.backend.calls(), 1);
}

#[tokio::test]
async fn fork_starts_a_fresh_draft() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;
    h.engine
        .revise_document(id, "make the title bigger")
        .await
        .unwrap();
    h.engine.finalize_document(id).await.unwrap();

    let forked = h.engine.fork_document(id).await.unwrap();
    assert_ne!(forked.document_id, id);
    assert_eq!(forked.version, 1);

    let (document, state) = h.engine.get_document(forked.document_id).await.unwrap();
    assert_eq!(state, StateKind::PreviewReady);
    assert!(document.history().is_empty());
    let origin = document.forked_from().unwrap();
    assert_eq!(origin.document_id, id);
    assert_eq!(origin.version, 2);
    assert_eq!(
        document.style_overrides().get("titleFontSize").map(String::as_str),
        Some("32px")
    );

    let outcome = h
        .engine
        .revise_document(forked.document_id, "bring a friend")
        .await
        .unwrap();
    assert_eq!(outcome.version, 2);
}

#[tokio::test]
async fn strict_preview_reports_missing_slots() {
    let h = harness();
    let id = h.engine.create_document(PARTY).await.unwrap().document_id;
    h.engine.revise_document(id, "clear the date").await.unwrap();

    let lenient = h.engine.render_preview(id, None).await.unwrap();
    assert_eq!(lenient.version, 2);

    let err = h
        .engine
        .render_preview(id, Some(RenderMode::Strict))
        .await
        .unwrap_err();
    assert!(matches!(
        &err.kind,
        EngineErrorKind::Export(ExportError::MissingRequired(missing))
            if missing == &vec!["date".to_string()]
    ));
    assert_eq!(err.current_version, Some(2));
}

#[tokio::test]
async fn configured_render_mode_is_the_default() {
    let h = harness_with(
        EngineConfig {
            render_mode: RenderMode::Strict,
        },
        None,
    );
    let id = h
        .engine
        .create_document("come to our summer party")
        .await
        .unwrap()
        .document_id;

    let err = h.engine.render_preview(id, None).await.unwrap_err();
    assert!(matches!(err.kind, EngineErrorKind::Export(ExportError::MissingRequired(_))));
    assert!(h.engine.render_preview(id, Some(RenderMode::Lenient)).await.is_ok());
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let h = harness();
    let missing = DocumentId::new();

    let err = h.engine.revise_document(missing, "hello").await.unwrap_err();
    assert_eq!(err.class(), ErrorClass::NotFound);
    assert_eq!(err.current_version, None);
    assert!(h.engine.finalize_document(missing).await.is_err());
    assert!(h.engine.fork_document(missing).await.is_err());
    assert!(h.generator.instructions().is_empty());
}

#[tokio::test]
async fn audio_flows_through_transcription() {
    let h = harness_with(EngineConfig::default(), Some(Arc::new(FixedTranscriber(PARTY))));

    let (transcription, outcome) = h
        .engine
        .create_document_from_audio(b"RIFF....WAVE", AudioFormat::Wav)
        .await
        .unwrap();
    assert_eq!(transcription.text, PARTY);
    assert_eq!(outcome.version, 1);
    assert_eq!(h.generator.instructions(), vec![PARTY.to_string()]);
}

#[tokio::test]
async fn audio_without_transcriber_is_transient() {
    let h = harness();
    let err = h
        .engine
        .create_document_from_audio(b"RIFF", AudioFormat::Wav)
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        EngineErrorKind::Transcription(TranscriptionError::Unavailable(_))
    ));
    assert!(err.is_retryable());
}

/// Replays model replies in order.
struct ScriptedModel {
    replies: Mutex<Vec<String>>,
}

impl ScriptedModel {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|r| r.to_string()).collect()),
        }
    }
}

impl GenerationBackend for ScriptedModel {
    fn generate<'a>(
        &'a self,
        _system_prompt: &'a str,
        _user_message: &'a str,
    ) -> BoxFuture<'a, Result<String, BedrockError>> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| BedrockError::Invocation("no reply scripted".to_string()));
        Box::pin(async move { reply })
    }
}

#[tokio::test]
async fn engine_runs_on_the_model_adapter() {
    let registry = Arc::new(TemplateRegistry::with_builtin().unwrap());
    let model = ScriptedModel::new(&[
        r#"{"template_change": "event",
            "field_updates": {"title": "Summer Party", "date": "July 12", "time": "5pm"},
            "rationale": "an invitation to a party"}"#,
        r#"```json
{"style_updates": {"titleFontSize": "32px"}}
```"#,
        r#"{"template_change": "flyer", "field_updates": {"title": "Winter Party"}}"#,
    ]);
    let adapter = ContentGeneratorAdapter::new(model, registry.clone());
    let backend = Arc::new(CountingBackend::default());
    let engine = RevisionEngine::new(
        registry,
        Arc::new(adapter),
        PdfEmitter::new(backend.clone()),
        EngineConfig::default(),
    );

    let created = engine.create_document(PARTY).await.unwrap();
    assert_eq!(created.template_id, TemplateId::new("event"));

    let revised = engine
        .revise_document(created.document_id, "make the title bigger")
        .await
        .unwrap();
    assert_eq!(revised.version, 2);
    assert!(revised.preview.css.contains("32px"));

    // The instruction gives no reason to leave the event template.
    let third = engine
        .revise_document(created.document_id, "call it the winter party")
        .await
        .unwrap();
    assert_eq!(third.template_id, TemplateId::new("event"));
    assert!(third.preview.html.contains("Winter Party"));

    let artifact = engine.finalize_document(created.document_id).await.unwrap();
    assert_eq!(artifact.version, 3);
    assert_eq!(backend.calls(), 1);
}
