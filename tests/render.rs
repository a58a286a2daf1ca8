use mdcard::block::BlockKind;
use mdcard::fonts::FontFamily;
use mdcard::surface::DrawOp;
use mdcard::{
    RecordingSurface, RenderError, Surface, Theme, ValidationError, layout_markdown,
    render_markdown, render_markdown_bytes,
};

fn png_dimensions(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n", "PNG signature");
    assert_eq!(&png[12..16], b"IHDR");
    (
        u32::from_be_bytes([png[16], png[17], png[18], png[19]]),
        u32::from_be_bytes([png[20], png[21], png[22], png[23]]),
    )
}

#[test]
fn renders_an_800_by_600_png() {
    let png = render_markdown("# Hello\n**bold** and *italic*\n---\n- item\n> quote 😀")
        .expect("render");
    assert_eq!(png_dimensions(&png), (800, 600));
}

#[test]
fn oversized_input_fails_before_anything_is_drawn() {
    let theme = Theme::default();
    let mut surface = RecordingSurface::new(theme.width, theme.height);
    let input = "x".repeat(6001);

    let err = layout_markdown(&input, &theme, &mut surface).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Validation(ValidationError::LengthExceeded {
            length: 6001,
            max: 6000
        })
    ));
    assert!(surface.ops().is_empty());

    assert!(render_markdown(&input).unwrap_err().is_validation());
}

#[test]
fn non_utf8_bytes_are_rejected() {
    let err = render_markdown_bytes(&[0xC3, 0x28], &Theme::default()).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Validation(ValidationError::TypeMismatch { .. })
    ));
}

#[test]
fn theme_limits_apply_to_layout() {
    let theme = Theme {
        max_input_len: 4,
        ..Theme::default()
    };
    let mut surface = RecordingSurface::new(theme.width, theme.height);
    assert!(layout_markdown("hello", &theme, &mut surface).is_err());
    assert!(layout_markdown("hell", &theme, &mut surface).is_ok());
}

#[test]
fn mixed_document_layout() {
    let theme = Theme::default();
    let mut surface = RecordingSurface::new(theme.width, theme.height);
    let report = layout_markdown(
        "# Title\n\nSome `code` here\n---\n- one\n2. two\n> note",
        &theme,
        &mut surface,
    )
    .expect("layout");

    let kinds: Vec<_> = report.lines.iter().map(|l| l.kind).collect();
    assert_eq!(kinds[0], BlockKind::Heading(1));
    assert_eq!(kinds[1], BlockKind::Paragraph);
    assert_eq!(kinds[2], BlockKind::Paragraph);
    assert_eq!(kinds[3], BlockKind::Rule);
    assert!(matches!(kinds[4], BlockKind::ListItem(_)));
    assert!(matches!(kinds[5], BlockKind::ListItem(_)));
    assert_eq!(kinds[6], BlockKind::Blockquote);

    assert_eq!(report.final_y(), 43.0 + 24.0 * 2.0 + 30.0 + 24.0 * 3.0);

    let code_backgrounds = surface
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::FillRect { height, .. } if *height == 20.0))
        .count();
    assert_eq!(code_backgrounds, 1);

    let png = surface.encode_png().expect("png");
    assert_eq!(png_dimensions(&png), (800, 600));
}

#[test]
fn digits_next_to_emoji_stay_in_the_text_face() {
    let theme = Theme::default();
    let mut surface = RecordingSurface::new(theme.width, theme.height);
    layout_markdown("2🔥3", &theme, &mut surface).expect("layout");

    let faces: Vec<_> = surface
        .texts()
        .map(|(text, font)| (text.to_string(), font.family))
        .collect();
    assert_eq!(
        faces,
        vec![
            ("2".to_string(), FontFamily::SansSerif),
            ("🔥".to_string(), FontFamily::Emoji),
            ("3".to_string(), FontFamily::SansSerif),
        ]
    );
}

#[test]
fn lines_overflowing_the_canvas_are_not_wrapped() {
    let theme = Theme::default();
    let mut surface = RecordingSurface::new(theme.width, theme.height);
    let long_line = "w".repeat(200);
    let report = layout_markdown(&long_line, &theme, &mut surface).expect("layout");

    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].x_end, 20.0 + 200.0 * 8.0);
    assert_eq!(report.final_y(), 24.0);
}
