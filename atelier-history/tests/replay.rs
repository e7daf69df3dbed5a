//! End-to-end conversation flow: stream a turn, get cut off, resume in the
//! next turn, then apply an explicit update — checking that the streaming
//! view and the replayed history agree at every step.

use atelier_core::{ArtifactOperation, ChatMessage, VersionOrigin};
use atelier_history::{latest_of, VersionAggregator};
use atelier_streaming::StreamingParser;

/// Run a whole turn through the streaming parser and return the stored
/// assistant message plus the resumable id, mimicking the calling loop.
fn stream_turn(parser: &mut StreamingParser, chunks: &[&str]) -> (ChatMessage, Option<String>) {
    let mut raw = String::new();
    for chunk in chunks {
        raw.push_str(chunk);
        parser.feed(chunk);
    }
    let end = parser.finalize();
    (ChatMessage::assistant(raw), end.resumable_artifact_id)
}

#[test]
fn test_truncated_turn_then_continuation() {
    let aggregator = VersionAggregator::new();
    let mut messages = Vec::new();

    // turn 1: the stream dies inside the artifact
    let mut parser = StreamingParser::new();
    let (message, resumable) = stream_turn(
        &mut parser,
        &[
            "Writing it now: ",
            r#"<artifact type="application/vnd.ant.code" id="calc" language="javascript" title="Calculator">"#,
            "function f() {",
        ],
    );
    messages.push(message);
    assert_eq!(resumable.as_deref(), Some("calc"));

    let history = aggregator.build_version_history(&messages, None);
    let calc = &history["calc"];
    assert_eq!(calc.len(), 1);
    assert!(!calc[0].is_complete);
    assert_eq!(calc[0].content, "function f() {");
    assert_eq!(calc[0].language.as_deref(), Some("javascript"));

    // turn 2: the model resumes where it left off
    let mut parser = StreamingParser::new().with_resumable("calc", calc[0].content.as_str());
    let (message, resumable) = stream_turn(
        &mut parser,
        &[
            r#"<artifact id="calc" continue="true">"#,
            "\n  return 1;\n}",
            "</artifact> All done.",
        ],
    );
    messages.push(message);
    assert_eq!(resumable, None);

    let history = aggregator.build_version_history(&messages, None);
    let calc = &history["calc"];
    assert_eq!(calc.len(), 2);
    assert!(calc[0].is_complete);
    assert_eq!(calc[1].origin, VersionOrigin::Continued);
    assert_eq!(calc[1].content, "function f() {\n  return 1;\n}");
    assert!(calc[1].is_complete);
}

#[test]
fn test_create_then_tool_update() {
    let aggregator = VersionAggregator::new();

    let messages = vec![
        ChatMessage::assistant(r#"Sure: <artifact id="b" title="Notes">line1</artifact>"#),
        ChatMessage::assistant("Appending a line.")
            .with_operation(ArtifactOperation::update("b", "line1", "line1\nline2")),
    ];

    let history = aggregator.build_version_history(&messages, None);
    let versions = &history["b"];

    let numbers: Vec<u32> = versions.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(versions[1].content, "line1\nline2");
    assert_eq!(versions[1].origin, VersionOrigin::Updated);
    assert_eq!(versions[1].title, "Notes");
}

#[test]
fn test_live_view_matches_final_history() {
    let aggregator = VersionAggregator::new();
    let messages = vec![ChatMessage::assistant(
        r#"<artifact id="doc" type="text/markdown"># Title</artifact>"#,
    )];

    // live turn in flight: a rewrite of the same artifact, streamed
    let full_live = r#"Rewriting: <artifact id="doc" type="text/markdown"># Better Title

Body.</artifact>"#;

    // while streaming, the version count grows exactly once
    for cut in [20, 40, full_live.len()] {
        let live = &full_live[..cut];
        let history = aggregator.build_version_history(&messages, Some(live));
        assert!(history["doc"].len() <= 2);
    }

    let history = aggregator.build_version_history(&messages, Some(full_live));
    assert_eq!(history["doc"].len(), 2);
    assert!(history["doc"][1].is_complete);
    assert_eq!(latest_of(&history)["doc"].content, "# Better Title\n\nBody.");
}

#[test]
fn test_streamed_content_equals_replayed_content() {
    let text = r#"Intro <artifact type="text/html" id="page" title="Page"><body>hi</body></artifact> outro"#;

    // streaming view, split awkwardly across marker boundaries
    let mut parser = StreamingParser::new();
    let mut streamed_text = String::new();
    let mut streamed_content = None;
    for chunk in [&text[..10], &text[10..28], &text[28..75], &text[75..]] {
        let out = parser.feed(chunk);
        streamed_text.push_str(&out.text_delta);
        for event in out.events {
            if let atelier_streaming::ArtifactStreamEvent::ArtifactEnd(end) = event {
                streamed_content = Some(end.content);
            }
        }
    }
    let end = parser.finalize();
    streamed_text.push_str(&end.text_delta);

    // replayed view of the same text as a stored message
    let history =
        VersionAggregator::new().build_version_history(&[ChatMessage::assistant(text)], None);

    assert_eq!(streamed_text, "Intro  outro");
    assert_eq!(streamed_content.as_deref(), Some("<body>hi</body>"));
    assert_eq!(history["page"][0].content, "<body>hi</body>");
}
