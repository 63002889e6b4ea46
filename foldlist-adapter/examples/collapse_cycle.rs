use foldlist_adapter::{
    Anchor, AnimationEnd, CollapsedSpan, Controller, ExpansionState, ItemAnim, Op,
};

fn main() {
    // Example: a collection owner collapsing six paragraphs into three summary lines.
    //
    // A host would:
    // - call begin_transition before swapping in the new data
    // - register anchors against the items still on screen
    // - apply the emitted operations to its list widget
    // - bind items as they are (re)created, and report animation ends
    let mut c: Controller = Controller::default();
    c.begin_transition(ExpansionState::Expanded).expect("idle");
    c.set_anchors(Vec::new(), &mut ()).expect("begun");
    c.notify_after_data_set(6, &mut Vec::<Op>::new())
        .expect("initial load");

    let mut on_screen: Vec<ItemAnim> = vec![ItemAnim::default(); 6];
    c.begin_transition(ExpansionState::Collapsed).expect("idle");
    c.set_anchors(
        [Anchor::new(
            4u64,
            4,
            1,
            ExpansionState::Collapsed,
            CollapsedSpan::new(3, 2),
        )],
        &mut on_screen,
    )
    .expect("begun");
    println!("pre-bound item 4: {:?}", on_screen[4]);

    let mut ops: Vec<Op> = Vec::new();
    c.notify_after_data_set(3, &mut ops).expect("valid anchors");
    for op in &ops {
        println!("{op:?}");
    }

    let mut rebound: Vec<ItemAnim> = vec![ItemAnim::default(); 3];
    for (position, item) in rebound.iter_mut().enumerate() {
        c.bind_item(item, position);
        println!("id[{position}]={}", c.item_id(position).expect("state set"));
    }

    let pending = c
        .on_animation_end(&4, &mut rebound[1], AnimationEnd::finished())
        .expect("anchor is live");
    if let Some(pending) = pending {
        let mut resync: Vec<Op> = Vec::new();
        c.apply_resync(pending, &mut resync).expect("anchor is live");
        println!(
            "resync={resync:?} suppressed={} id[1]={}",
            c.take_suppression(1),
            c.item_id(1).expect("state set")
        );
    }
}
