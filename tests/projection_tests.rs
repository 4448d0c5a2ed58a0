//! Integration tests for toposcope
//!
//! These tests exercise the projection engine end to end against a
//! realistic inventory snapshot: tree shapes per filter, security group
//! aggregation, pruning, and the view-model controllers.

use std::path::Path;
use toposcope::model::{content_hash, Region};
use toposcope::projection::{project, ProjectionCache, ResourceFilter, ViewNode};
use toposcope::tui::viewmodel::{ExpansionPolicy, SelectionController};
use toposcope::tui::widgets::visible_nodes;

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn load_fixture() -> Vec<Region> {
    let raw = std::fs::read_to_string(fixture_path("inventory.json"))
        .expect("Failed to read inventory fixture");
    serde_json::from_str(&raw).expect("Failed to decode inventory fixture")
}

const ALL_FILTERS: [ResourceFilter; 5] = [
    ResourceFilter::All,
    ResourceFilter::Vpc,
    ResourceFilter::Subnet,
    ResourceFilter::Instance,
    ResourceFilter::SecurityGroup,
];

// ============================================================================
// Decode Tests
// ============================================================================

mod decode_tests {
    use super::*;

    #[test]
    fn fixture_decodes_with_lenient_fields() {
        let inventory = load_fixture();
        assert_eq!(inventory.len(), 3);

        // Instance without public_ip or subnet_id still decodes.
        let api = &inventory[1].vpcs[0].subnets[0].instances[0];
        assert_eq!(api.id, "i-eu01");
        assert!(api.public_ip.is_none());
        assert!(api.subnet_id.is_none());

        // Rule with null ports decodes to None.
        let open_rule = &api.security_rules[1];
        assert!(open_rule.from_port.is_none());
        assert!(open_rule.to_port.is_none());

        // Errored region keeps its message and an empty VPC list.
        let failed = &inventory[2];
        assert!(failed.error.is_some());
        assert!(failed.vpcs.is_empty());
    }

    #[test]
    fn region_counts_span_the_whole_subtree() {
        let inventory = load_fixture();
        assert_eq!(inventory[0].subnet_count(), 3);
        assert_eq!(inventory[0].instance_count(), 3);
        assert_eq!(inventory[2].instance_count(), 0);
    }
}

// ============================================================================
// Tree Projection Tests
// ============================================================================

mod tree_tests {
    use super::*;

    #[test]
    fn all_filter_projects_the_full_tree() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::All);

        let roots = projection.roots();
        assert_eq!(roots.len(), 3);

        // The errored region is kept, childless, with its message.
        match &roots[2] {
            ViewNode::Region {
                name,
                error,
                children,
            } => {
                assert_eq!(name, "ap-southeast-2");
                assert!(error.is_some());
                assert!(children.is_empty());
            }
            other => panic!("expected region root, got {}", other.node_id()),
        }

        // Depth runs region -> vpc -> subnet -> instance.
        let prod_subnet = &roots[0].children()[0].children()[0];
        assert_eq!(prod_subnet.node_id(), "subnet:subnet-aaa111");
        assert_eq!(prod_subnet.children()[0].node_id(), "instance:i-0001");
    }

    #[test]
    fn vpc_filter_stops_at_vpcs() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::Vpc);

        let roots = projection.roots();
        // No pruning under this filter: the errored region survives.
        assert_eq!(roots.len(), 3);

        for region in roots {
            for vpc in region.children() {
                assert!(vpc.children().is_empty(), "VPC nodes must be childless");
                assert!(vpc.node_id().starts_with("vpc:"));
            }
        }
    }

    #[test]
    fn security_group_filter_aggregates_first_seen_per_vpc() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::SecurityGroup);

        let roots = projection.roots();
        // The errored region and the group-less staging VPC are pruned.
        assert_eq!(roots.len(), 2);

        let prod_groups: Vec<&str> = roots[0].children()[0]
            .children()
            .iter()
            .map(|n| match n {
                ViewNode::SecurityGroup { group, .. } => group.id.as_str(),
                other => panic!("expected group leaf, got {}", other.node_id()),
            })
            .collect();
        // Walk order is subnet, then instance, then rule. sg-web appears on
        // two instances but is listed once at its first position.
        assert_eq!(prod_groups, vec!["sg-web", "sg-ops", "sg-db"]);

        // Only one VPC remains in us-east-1 after pruning staging.
        assert_eq!(roots[0].children().len(), 1);
    }

    #[test]
    fn group_seen_in_two_subnets_is_listed_once_with_first_name() {
        use toposcope::model::{Instance, SecurityRule, Subnet, Vpc};

        let rule = |sg_id: &str, sg_name: &str| SecurityRule {
            sg_id: sg_id.to_string(),
            sg_name: sg_name.to_string(),
            ..SecurityRule::default()
        };
        let inventory = vec![Region {
            region: "us-east-1".to_string(),
            vpcs: vec![Vpc {
                id: "vpc-1".to_string(),
                name: "main".to_string(),
                subnets: vec![
                    Subnet {
                        id: "subnet-a".to_string(),
                        instances: vec![Instance {
                            id: "i-1".to_string(),
                            security_rules: vec![rule("sg-1", "web")],
                            ..Instance::default()
                        }],
                        ..Subnet::default()
                    },
                    Subnet {
                        id: "subnet-b".to_string(),
                        instances: vec![Instance {
                            id: "i-2".to_string(),
                            security_rules: vec![rule("sg-1", "web"), rule("sg-2", "db")],
                            ..Instance::default()
                        }],
                        ..Subnet::default()
                    },
                ],
                ..Vpc::default()
            }],
            error: None,
        }];

        let projection = project(&inventory, ResourceFilter::SecurityGroup);
        let roots = projection.roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children().len(), 1);
        let summaries: Vec<(&str, &str)> = roots[0].children()[0]
            .children()
            .iter()
            .map(|n| match n {
                ViewNode::SecurityGroup { group, .. } => {
                    (group.id.as_str(), group.name.as_str())
                }
                other => panic!("expected group leaf, got {}", other.node_id()),
            })
            .collect();
        assert_eq!(summaries, vec![("sg-1", "web"), ("sg-2", "db")]);

        // Under the network lens the same VPC renders childless.
        let vpc_projection = project(&inventory, ResourceFilter::Vpc);
        let vpc = &vpc_projection.roots()[0].children()[0];
        assert!(vpc.children().is_empty());
    }

    #[test]
    fn security_group_filter_drops_unattributed_rules() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::SecurityGroup);

        let roots = projection.roots();
        let eu_groups = roots[1].children()[0].children();
        // The rule with an empty sg_id never becomes a node.
        assert_eq!(eu_groups.len(), 1);
        assert_eq!(eu_groups[0].node_id(), "sg:sg-api");
    }
}

// ============================================================================
// Flat Projection Tests
// ============================================================================

mod flat_tests {
    use super::*;
    use toposcope::projection::FlatRow;

    #[test]
    fn instance_rows_carry_their_placement_context() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::Instance);

        let rows = projection.rows();
        assert_eq!(rows.len(), 4);

        match &rows[0] {
            FlatRow::Instance(row) => {
                assert_eq!(row.instance.id, "i-0001");
                assert_eq!(row.az, "us-east-1a");
                assert_eq!(row.vpc_name, "prod");
                assert_eq!(row.subnet_name, "prod-public-a");
                assert_eq!(row.region, "us-east-1");
            }
            other => panic!("expected instance row, got {other:?}"),
        }

        // Traversal order is preserved: prod subnets first, then eu.
        let ids: Vec<&str> = rows
            .iter()
            .map(|r| match r {
                FlatRow::Instance(row) => row.instance.id.as_str(),
                other => panic!("expected instance row, got {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["i-0001", "i-0002", "i-0003", "i-eu01"]);
    }

    #[test]
    fn subnet_rows_include_empty_subnets() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::Subnet);

        let rows = projection.rows();
        assert_eq!(rows.len(), 4);

        let staging = rows
            .iter()
            .find_map(|r| match r {
                FlatRow::Subnet(row) if row.subnet.id == "subnet-ccc333" => Some(row),
                _ => None,
            })
            .expect("staging subnet row");
        assert_eq!(staging.instance_count, 0);
        assert_eq!(staging.vpc_name, "staging");
    }
}

// ============================================================================
// Edge Cases
// ============================================================================

mod edge_cases {
    use super::*;

    #[test]
    fn empty_inventory_is_empty_under_every_filter() {
        let inventory: Vec<Region> = Vec::new();
        for filter in ALL_FILTERS {
            let projection = project(&inventory, filter);
            assert!(projection.is_empty(), "filter {filter:?} must project empty");
        }
    }

    #[test]
    fn projection_never_mutates_the_inventory() {
        let inventory = load_fixture();
        let before = content_hash(&inventory);
        for filter in ALL_FILTERS {
            let _ = project(&inventory, filter);
        }
        assert_eq!(content_hash(&inventory), before);
    }

    #[test]
    fn cache_returns_identical_projection_for_same_key() {
        let inventory = load_fixture();
        let mut cache = ProjectionCache::default();

        let first = cache.get(&inventory, ResourceFilter::SecurityGroup).clone();
        let second = cache.get(&inventory, ResourceFilter::SecurityGroup).clone();
        assert_eq!(first, second);

        // Switching filters recomputes but stays deterministic.
        let _ = cache.get(&inventory, ResourceFilter::Instance);
        let third = cache.get(&inventory, ResourceFilter::SecurityGroup).clone();
        assert_eq!(first, third);
    }
}

// ============================================================================
// View-Model Tests
// ============================================================================

mod viewmodel_tests {
    use super::*;

    #[test]
    fn collapsed_policy_starts_with_only_roots_visible() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::All);

        let policy = ExpansionPolicy::for_filter(ResourceFilter::All);
        let visible = visible_nodes(projection.roots(), &policy);
        assert_eq!(visible.len(), 3);
        assert!(visible.iter().all(|n| n.depth == 0));
    }

    #[test]
    fn expand_all_policy_shows_the_whole_tree_and_ignores_toggles() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::SecurityGroup);

        let mut policy = ExpansionPolicy::for_filter(ResourceFilter::SecurityGroup);
        let before = visible_nodes(projection.roots(), &policy).len();
        assert!(!policy.allows_toggling());

        policy.toggle("region:us-east-1");
        assert_eq!(visible_nodes(projection.roots(), &policy).len(), before);
    }

    #[test]
    fn opening_a_region_reveals_its_vpcs() {
        let inventory = load_fixture();
        let projection = project(&inventory, ResourceFilter::All);

        let mut policy = ExpansionPolicy::for_filter(ResourceFilter::All);
        policy.toggle("region:us-east-1");

        let visible = visible_nodes(projection.roots(), &policy);
        assert_eq!(visible.len(), 5);
        assert!(visible
            .iter()
            .any(|n| n.node.node_id() == "vpc:vpc-0a1b2c3d"));
        // Other regions stay closed.
        assert!(!visible.iter().any(|n| n.node.node_id() == "vpc:vpc-eu0001"));
    }

    #[test]
    fn selection_holds_a_copy_across_reprojection() {
        let inventory = load_fixture();
        let mut selection = SelectionController::default();

        let instance = &inventory[0].vpcs[0].subnets[0].instances[0];
        selection.select(instance);
        assert!(selection.is_selected("i-0001"));

        // Reprojecting under a different filter does not disturb the slot.
        let _ = project(&inventory, ResourceFilter::SecurityGroup);
        assert_eq!(selection.selected().map(|i| i.id.as_str()), Some("i-0001"));

        // Re-selecting the same instance keeps it; only clear dismisses.
        selection.select(instance);
        assert!(selection.is_selected("i-0001"));
        selection.clear();
        assert!(selection.selected().is_none());
    }
}

// ============================================================================
// Projection/Cache Interaction
// ============================================================================

mod cache_tests {
    use super::*;

    #[test]
    fn content_hash_changes_when_inventory_changes() {
        let mut inventory = load_fixture();
        let before = content_hash(&inventory);

        inventory[0].vpcs[0].subnets[0].instances[0].state = "stopped".to_string();
        assert_ne!(content_hash(&inventory), before);
    }

    #[test]
    fn projection_matches_direct_computation() {
        let inventory = load_fixture();
        let mut cache = ProjectionCache::default();

        for filter in ALL_FILTERS {
            let cached = cache.get(&inventory, filter).clone();
            assert_eq!(cached, project(&inventory, filter));
        }
    }
}
