//! Property-based tests for block scanning, method reconstruction and
//! font-face rewriting.

use proptest::prelude::*;
use sfc_extract::font_face::scan_font_faces;
use sfc_extract::{
    find_balanced_block, replace_font_faces_for_print, split_sections, FontClass,
    FontFaceReplacements, MethodTable,
};

/// Brace-balanced text with arbitrary nesting and filler.
fn balanced_strategy() -> impl Strategy<Value = String> {
    let leaf = "[a-z0-9 ;=+]{0,8}";
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(|parts| {
            parts
                .into_iter()
                .map(|p| format!("{{{}}}", p))
                .collect::<Vec<_>>()
                .join(" ")
        })
    })
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-zA-Z0-9_]{0,8}"
}

fn font_face_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("@font-face{font-family:A;}".to_string()),
        Just("@font-face{font-weight:bold;}".to_string()),
        Just("@font-face{font-style:italic;}".to_string()),
    ]
}

proptest! {
    #[test]
    fn balanced_block_is_balanced(prefix in "[a-z ]{0,5}", body in balanced_strategy()) {
        let text = format!("{}{{{}}} trailing }}", prefix, body);
        let block = find_balanced_block(&text, 0).unwrap();

        let mut depth: i64 = 0;
        for c in block.text.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            prop_assert!(depth >= 0);
        }
        prop_assert_eq!(depth, 0);
        prop_assert_eq!(block.inner(), body.as_str());
    }

    #[test]
    fn unterminated_block_never_panics(body in balanced_strategy()) {
        let text = format!("{{{{{}", body);
        prop_assert!(find_balanced_block(&text, 0).is_err());
    }

    #[test]
    fn method_records_reconstruct_their_span(
        name in identifier_strategy(),
        params in prop::collection::vec(identifier_strategy(), 0..4),
        body in balanced_strategy(),
    ) {
        let signature = format!("{}({})", name, params.join(","));
        let behavior = format!("methods:{{{}{{{}}}}}", signature, body);
        let record = MethodTable::new(&behavior).next().unwrap().unwrap();

        prop_assert_eq!(&record.name, &name);
        prop_assert_eq!(&record.parameters, &params);
        prop_assert_eq!(record.reconstruct(), behavior[record.span.clone()].to_string());
    }

    #[test]
    fn markup_runs_to_last_template_end(
        inner in "[a-z ]{0,10}",
        outer in "[a-z ]{0,10}",
    ) {
        let src = format!("<template>{}</template>{}</template>", inner, outer);
        let sections = split_sections(&src);
        prop_assert_eq!(sections.markup, format!("{}</template>{}", inner, outer));
    }

    #[test]
    fn font_face_rewrite_is_idempotent_for_identity_table(
        faces in prop::collection::vec(font_face_strategy(), 0..6),
        filler in "[a-z ]{0,6}",
    ) {
        let separator = format!("\n{}\n", filler);
        let style = faces.join(separator.as_str());
        let blocks = scan_font_faces(&style);

        let mut table = FontFaceReplacements::default();
        for block in &blocks {
            let slot = match block.classification {
                FontClass::Italic => &mut table.italic,
                FontClass::Bold => &mut table.bold,
                FontClass::Classic => &mut table.classic,
            };
            *slot = block.raw_text.clone();
        }

        let once = replace_font_faces_for_print(&style, &table);
        let twice = replace_font_faces_for_print(&once, &table);
        prop_assert_eq!(&once, &style);
        prop_assert_eq!(once, twice);
    }
}
