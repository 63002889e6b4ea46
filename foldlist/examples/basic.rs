use foldlist::{Anchor, CollapsedSpan, ExpansionState, ShadowList, reconcile};

fn main() {
    // Ten expanded paragraphs collapse into four summary lines. Paragraphs 2 and 7 are anchored
    // so they animate; everything else is replaced.
    let anchors = [
        Anchor::new(
            2u64,
            2,
            0,
            ExpansionState::Collapsed,
            CollapsedSpan::new(0, 1),
        ),
        Anchor::new(
            7u64,
            7,
            3,
            ExpansionState::Collapsed,
            CollapsedSpan::new(3, 2),
        ),
    ];

    let ops = reconcile(10, 4, &anchors).expect("anchors are valid");
    for op in &ops {
        println!("{op:?}");
    }

    let mut shadow = ShadowList::new(10);
    shadow.apply_all(&ops).expect("plan replays");
    println!("after: {:?}", shadow.slots());
}
