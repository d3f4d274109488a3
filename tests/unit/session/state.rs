use super::*;

#[test]
fn happy_path_transitions() {
    let mut trace = ExportTrace::new();
    for next in [
        ExportState::Rendering,
        ExportState::Compositing,
        ExportState::Encoding,
        ExportState::Done,
    ] {
        trace.advance(next);
    }
    assert_eq!(
        trace.states(),
        [
            ExportState::Idle,
            ExportState::Rendering,
            ExportState::Compositing,
            ExportState::Encoding,
            ExportState::Done,
        ]
    );
    assert!(trace.current().is_terminal());
}

#[test]
fn terminal_states_do_not_move() {
    let mut trace = ExportTrace::new();
    trace.advance(ExportState::Failed(ErrorKind::FrameNotFound));
    trace.advance(ExportState::Rendering);
    trace.advance(ExportState::Done);
    assert_eq!(
        trace.into_states(),
        [ExportState::Idle, ExportState::Failed(ErrorKind::FrameNotFound)]
    );
}

#[test]
fn stages_cannot_be_skipped() {
    assert!(!ExportState::Idle.can_advance_to(ExportState::Encoding));
    assert!(!ExportState::Rendering.can_advance_to(ExportState::Done));
    assert!(ExportState::Compositing.can_advance_to(ExportState::Superseded));
    assert!(!ExportState::Superseded.can_advance_to(ExportState::Failed(ErrorKind::Other)));
}

#[test]
fn notices_name_the_format() {
    assert_eq!(
        failure_notice(ExportFormat::Png),
        "Failed to generate PNG. Please try again."
    );
    assert_eq!(
        failure_notice(ExportFormat::Jpeg),
        "Failed to generate JPEG. Please try again."
    );
    assert_eq!(
        failure_notice(ExportFormat::Svg),
        "Failed to generate SVG. Please try PNG or JPEG instead."
    );
}
