//! Properties of removal over generated section outlines.

use nbprune::formats::markdown::MarkdownFormat;
use nbprune::input::scan_sections;
use nbprune::{remove_section, remove_sections, Cell, CellKind, SectionId, SectionLocalizer};
use proptest::prelude::*;

/// A cell that remembers which section it was generated under.
#[derive(Clone, Debug, PartialEq)]
struct TracedCell {
    owner: SectionId,
    kind: CellKind,
    source: String,
}

impl Cell for TracedCell {
    fn source(&self) -> &str {
        &self.source
    }

    fn set_source(&mut self, source: String) {
        self.source = source;
    }

    fn kind(&self) -> CellKind {
        self.kind
    }
}

/// Top-level sections, each listing the number of sub-subsections under each of its subsections.
type Outline = Vec<Vec<usize>>;

fn outlines(top_level: std::ops::Range<usize>) -> impl Strategy<Value = Outline> {
    prop::collection::vec(prop::collection::vec(0usize..3, 0..3), top_level)
}

fn push_section(cells: &mut Vec<TracedCell>, localizer: &mut SectionLocalizer, path: &[usize]) {
    let segments = path.iter().map(|&p| u32::try_from(p + 1).unwrap()).collect();
    let id = SectionId::from_segments(segments).unwrap();
    localizer.insert(id.clone(), cells.len());
    cells.push(TracedCell {
        owner: id.clone(),
        kind: CellKind::Markdown,
        source: format!("{} {} Section", "#".repeat(id.depth()), id),
    });
    cells.push(TracedCell {
        owner: id,
        kind: CellKind::Code,
        source: "run()".to_string(),
    });
}

fn build(outline: &Outline) -> (Vec<TracedCell>, SectionLocalizer) {
    let mut cells = Vec::new();
    let mut localizer = SectionLocalizer::new();
    for (i, children) in outline.iter().enumerate() {
        push_section(&mut cells, &mut localizer, &[i]);
        for (j, &grandchildren) in children.iter().enumerate() {
            push_section(&mut cells, &mut localizer, &[i, j]);
            for k in 0..grandchildren {
                push_section(&mut cells, &mut localizer, &[i, j, k]);
            }
        }
    }
    (cells, localizer)
}

/// Zero-based paths of every section in document order.
fn paths(outline: &Outline) -> Vec<Vec<usize>> {
    let mut all = Vec::new();
    for (i, children) in outline.iter().enumerate() {
        all.push(vec![i]);
        for (j, &grandchildren) in children.iter().enumerate() {
            all.push(vec![i, j]);
            all.extend((0..grandchildren).map(|k| vec![i, j, k]));
        }
    }
    all
}

fn without(outline: &Outline, path: &[usize]) -> Outline {
    let mut pruned = outline.clone();
    match *path {
        [i] => {
            pruned.remove(i);
        }
        [i, j] => {
            pruned[i].remove(j);
        }
        [i, j, _] => pruned[i][j] -= 1,
        _ => unreachable!("outlines are three levels deep"),
    }
    pruned
}

fn section_id(path: &[usize]) -> SectionId {
    SectionId::from_segments(path.iter().map(|&p| u32::try_from(p + 1).unwrap()).collect()).unwrap()
}

fn sources(cells: &[TracedCell]) -> Vec<&str> {
    cells.iter().map(|cell| cell.source.as_str()).collect()
}

proptest! {
    #[test]
    fn prop_removal_matches_rebuilt_document(outline in outlines(1..5), pick in any::<prop::sample::Index>()) {
        let (cells, localizer) = build(&outline);
        let all = paths(&outline);
        let path = pick.get(&all);
        let target = section_id(path);

        let removal = remove_section(&cells, &localizer, &target).unwrap();

        // Exactly the target's cells and its descendants' cells are gone, in order.
        let expected_owners: Vec<&SectionId> = cells
            .iter()
            .filter(|cell| !target.contains(&cell.owner))
            .map(|cell| &cell.owner)
            .collect();
        let owners: Vec<&SectionId> = removal.cells.iter().map(|cell| &cell.owner).collect();
        prop_assert_eq!(owners, expected_owners);

        prop_assert_eq!(
            removal.cells.len(),
            cells.len() - removal.report.cells_removed()
        );
        prop_assert!(removal.localizer.iter().all(|(_, cell)| cell < removal.cells.len()));
        prop_assert!(removal.report.dropped.iter().all(|id| target.contains(id)));

        // The result is what building the smaller outline from scratch gives.
        let (expected_cells, expected_localizer) = build(&without(&outline, path));
        prop_assert_eq!(sources(&removal.cells), sources(&expected_cells));
        prop_assert_eq!(&removal.localizer, &expected_localizer);

        // Text and map agree.
        let rescanned = scan_sections(&removal.cells, &MarkdownFormat).unwrap();
        prop_assert_eq!(rescanned, removal.localizer);
    }

    #[test]
    fn prop_batch_of_top_level_sections(
        outline in outlines(2..6),
        first in any::<prop::sample::Index>(),
        second in any::<prop::sample::Index>(),
    ) {
        let a = first.index(outline.len());
        let b = second.index(outline.len() - 1);
        let b = if b >= a { b + 1 } else { b };

        let (cells, localizer) = build(&outline);
        let batch = remove_sections(
            &cells,
            &localizer,
            [section_id(&[a]), section_id(&[b])],
        )
        .unwrap();

        let later = a.max(b);
        prop_assert_eq!(&batch.reports[0].section, &section_id(&[later]));

        let expected_outline = without(&without(&outline, &[later]), &[a.min(b)]);
        let (expected_cells, expected_localizer) = build(&expected_outline);
        prop_assert_eq!(sources(&batch.cells), sources(&expected_cells));
        prop_assert_eq!(batch.localizer, expected_localizer);
    }
}

#[test]
fn test_batch_outcome_independent_of_request_order() {
    let outline: Outline = vec![vec![1], vec![0, 2], vec![], vec![1]];
    let (cells, localizer) = build(&outline);

    let forward = remove_sections(
        &cells,
        &localizer,
        [section_id(&[0, 0]), section_id(&[1]), section_id(&[3])],
    )
    .unwrap();
    let backward = remove_sections(
        &cells,
        &localizer,
        [section_id(&[3]), section_id(&[1]), section_id(&[0, 0])],
    )
    .unwrap();

    assert_eq!(forward.cells, backward.cells);
    assert_eq!(forward.localizer, backward.localizer);
}
