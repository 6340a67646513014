//! Phase 4: Turn surviving clusters into display groups.

use crate::config::{Group, LabelFormat, Node, Palette};
use crate::phases::clusters::{ClusterId, ClusterRegistry};

/// Group name for the cluster at registry position `slot`.
pub fn group_name(slot: ClusterId) -> String {
    format!("cluster{slot}")
}

/// Run the decorate phase.
///
/// Every member of a live cluster receives a palette color by its position in
/// the cluster and the name of its group. The registry is consumed; nodes that
/// never appeared in a link are left undecorated.
pub fn run_decorate_phase(
    nodes: &mut [Node],
    registry: ClusterRegistry,
    palette: &Palette,
    format: LabelFormat,
) -> Vec<Group> {
    let mut groups = Vec::new();

    for (slot, members) in registry.into_live_clusters() {
        let name = group_name(slot);
        let mut labels = Vec::with_capacity(members.len());

        for (position, &idx) in members.iter().enumerate() {
            let color = palette.color_for(position);
            if let Some(node) = nodes.get_mut(idx) {
                labels.push(format.format_member(&node.name, color));
                node.color = Some(color.to_string());
                node.group = Some(name.clone());
            }
        }

        groups.push(Group {
            name,
            tooltip: labels.join(format.separator()),
            members,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(names: &[&str]) -> Vec<Node> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Node::new(n, i))
            .collect()
    }

    #[test]
    fn colors_by_member_position() {
        let mut ns = nodes(&["a", "b", "c"]);
        let mut reg = ClusterRegistry::new(3);
        reg.connect(2, 0);
        reg.connect(0, 1);
        let groups = run_decorate_phase(&mut ns, reg, &Palette::default(), LabelFormat::Html);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec![2, 0, 1]);
        assert_eq!(ns[2].color.as_deref(), Some("#f08080"));
        assert_eq!(ns[0].color.as_deref(), Some("#a0f0a0"));
        assert_eq!(ns[1].color.as_deref(), Some("#a0a0f0"));
    }

    #[test]
    fn html_tooltip_in_member_order() {
        let mut ns = nodes(&["a", "b"]);
        let mut reg = ClusterRegistry::new(2);
        reg.connect(1, 0);
        let groups = run_decorate_phase(&mut ns, reg, &Palette::default(), LabelFormat::Html);
        assert_eq!(
            groups[0].tooltip,
            "<span style=\"color:#f08080\">b</span><br><span style=\"color:#a0f0a0\">a</span>"
        );
    }

    #[test]
    fn names_follow_registry_slots() {
        let mut ns = nodes(&["a", "b", "c", "d", "e", "f"]);
        let mut reg = ClusterRegistry::new(6);
        reg.connect(0, 1); // slot 0
        reg.connect(2, 3); // slot 1
        reg.connect(4, 5); // slot 2
        reg.connect(2, 0); // slot 0 retired into slot 1
        let groups = run_decorate_phase(&mut ns, reg, &Palette::default(), LabelFormat::Plain);

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["cluster1", "cluster2"]);
        assert_eq!(ns[0].group.as_deref(), Some("cluster1"));
        assert_eq!(ns[5].group.as_deref(), Some("cluster2"));
    }

    #[test]
    fn palette_overflow_cycles() {
        let palette = Palette::new(vec!["red".into(), "blue".into()]).unwrap();
        let mut ns = nodes(&["a", "b", "c", "d"]);
        let mut reg = ClusterRegistry::new(4);
        reg.connect(0, 1);
        reg.connect(1, 2);
        reg.connect(2, 3);
        run_decorate_phase(&mut ns, reg, &palette, LabelFormat::Plain);
        let colors: Vec<&str> = ns.iter().filter_map(|n| n.color.as_deref()).collect();
        assert_eq!(colors, vec!["red", "blue", "red", "blue"]);
    }

    #[test]
    fn isolated_nodes_stay_undecorated() {
        let mut ns = nodes(&["a", "b", "lonely"]);
        let mut reg = ClusterRegistry::new(3);
        reg.connect(0, 1);
        run_decorate_phase(&mut ns, reg, &Palette::default(), LabelFormat::Html);
        assert!(ns[2].color.is_none());
        assert!(ns[2].group.is_none());
        assert!(ns[2].is_isolated());
    }

    #[test]
    fn empty_registry_yields_no_groups() {
        let mut ns = nodes(&["a"]);
        let groups = run_decorate_phase(
            &mut ns,
            ClusterRegistry::new(1),
            &Palette::default(),
            LabelFormat::Html,
        );
        assert!(groups.is_empty());
        assert!(ns[0].is_isolated());
    }
}
