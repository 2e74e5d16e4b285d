//! Rule-based defect categorization.
//!
//! Rules are rows of a static table evaluated top to bottom; the first rule
//! whose predicate holds decides the category. Rules overlap, so their order
//! in [`RULES`] is their precedence.

/// Defect category assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectCategory {
    /// Cut did not go through the material.
    IncompleteCut,
    /// Burnt or charred edge.
    Overheating,
    /// Burrs, fuzz or otherwise irregular edge.
    IrregularEdge,
    /// Part cut out of position.
    Misalignment,
    /// Part dimensions out of range.
    IncorrectDimension,
    /// Material warped by heat.
    HeatDeformation,
    /// Machine malfunction reported.
    MachineError,
    /// No rule matched.
    Excluded,
}

impl DefectCategory {
    /// Every category, in rule order.
    pub const ALL: [Self; 8] = [
        Self::IncompleteCut,
        Self::Overheating,
        Self::IrregularEdge,
        Self::Misalignment,
        Self::IncorrectDimension,
        Self::HeatDeformation,
        Self::MachineError,
        Self::Excluded,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::IncompleteCut => "incomplete cut",
            Self::Overheating => "overheating",
            Self::IrregularEdge => "irregular edge",
            Self::Misalignment => "misalignment",
            Self::IncorrectDimension => "incorrect dimension",
            Self::HeatDeformation => "heat deformation",
            Self::MachineError => "machine error",
            Self::Excluded => "excluded",
        }
    }
}

impl std::fmt::Display for DefectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Operator- or upstream-supplied description of a rejected part.
///
/// Field aliases accept the payload keys used by the plant's existing
/// record forms.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AttributeBundle {
    /// Free-text defect description.
    #[serde(alias = "descripcion")]
    pub description: String,
    /// Edge color descriptor, e.g. `"dark"`.
    #[serde(alias = "color_borde")]
    pub edge_color: String,
    /// Edge characteristic descriptor, e.g. `"burr"`.
    #[serde(alias = "caracteristica_borde")]
    pub edge_characteristic: String,
    /// Measured cut depth (mm).
    #[serde(alias = "profundidad_corte")]
    pub cut_depth: Option<f64>,
    /// Material thickness (mm).
    #[serde(alias = "espesor_material")]
    pub material_thickness: Option<f64>,
    /// Dimensions outside the allowed range.
    #[serde(alias = "dimension_fuera_rango")]
    pub dimension_out_of_range: bool,
    /// Machine fault reported during the cut.
    #[serde(alias = "falla_maquina")]
    pub machine_fault: bool,
    /// Part misaligned on the bed.
    #[serde(alias = "desalineado")]
    pub misaligned: bool,
    /// Material deformed by heat.
    #[serde(alias = "deformacion_material")]
    pub heat_deformed: bool,
}

/// One row of a first-match rule table.
#[derive(Debug)]
pub struct Rule<I, O> {
    /// Short rule identifier.
    pub name: &'static str,
    /// Condition on the input.
    pub predicate: fn(&I) -> bool,
    /// Result when the predicate holds.
    pub outcome: O,
}

/// Return the first rule in `rules` whose predicate holds for `input`.
pub fn first_match<'r, I, O>(rules: &'r [Rule<I, O>], input: &I) -> Option<&'r Rule<I, O>> {
    rules.iter().find(|rule| (rule.predicate)(input))
}

const BURN_TERMS: &[&str] = &["burn", "char", "scorch", "quemad", "carboniz"];
const DARK_COLORS: &[&str] = &["dark", "oscuro"];
const IRREGULAR_TERMS: &[&str] = &["irregular", "burr", "fuzz", "rebaba", "pelosidad"];

fn mentions_any(text: &str, terms: &[&str]) -> bool {
    let text = text.to_lowercase();
    terms.iter().any(|t| text.contains(t))
}

fn is_incomplete_cut(b: &AttributeBundle) -> bool {
    matches!((b.cut_depth, b.material_thickness), (Some(depth), Some(thick)) if depth < thick)
}

fn is_overheated(b: &AttributeBundle) -> bool {
    let color = b.edge_color.trim().to_lowercase();
    mentions_any(&b.description, BURN_TERMS) || DARK_COLORS.contains(&color.as_str())
}

fn has_irregular_edge(b: &AttributeBundle) -> bool {
    mentions_any(&b.edge_characteristic, IRREGULAR_TERMS)
}

/// Classification rules in precedence order. The last row always matches.
pub const RULES: &[Rule<AttributeBundle, DefectCategory>] = &[
    Rule {
        name: "depth_below_thickness",
        predicate: is_incomplete_cut,
        outcome: DefectCategory::IncompleteCut,
    },
    Rule {
        name: "burnt_or_dark_edge",
        predicate: is_overheated,
        outcome: DefectCategory::Overheating,
    },
    Rule {
        name: "irregular_edge_texture",
        predicate: has_irregular_edge,
        outcome: DefectCategory::IrregularEdge,
    },
    Rule {
        name: "misaligned_flag",
        predicate: |b| b.misaligned,
        outcome: DefectCategory::Misalignment,
    },
    Rule {
        name: "dimension_out_of_range_flag",
        predicate: |b| b.dimension_out_of_range,
        outcome: DefectCategory::IncorrectDimension,
    },
    Rule {
        name: "heat_deformed_flag",
        predicate: |b| b.heat_deformed,
        outcome: DefectCategory::HeatDeformation,
    },
    Rule {
        name: "machine_fault_flag",
        predicate: |b| b.machine_fault,
        outcome: DefectCategory::MachineError,
    },
    Rule {
        name: "no_rule_matched",
        predicate: |_| true,
        outcome: DefectCategory::Excluded,
    },
];

/// Assign exactly one category to `bundle`.
pub fn classify(bundle: &AttributeBundle) -> DefectCategory {
    classify_explained(bundle).0
}

/// Like [`classify`], also returning the name of the deciding rule.
pub fn classify_explained(bundle: &AttributeBundle) -> (DefectCategory, &'static str) {
    match first_match(RULES, bundle) {
        Some(rule) => (rule.outcome, rule.name),
        None => (DefectCategory::Excluded, "no_rule_matched"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> AttributeBundle {
        AttributeBundle::default()
    }

    #[test]
    fn empty_bundle_is_excluded() {
        assert_eq!(classify(&bundle()), DefectCategory::Excluded);
        let (_, rule) = classify_explained(&bundle());
        assert_eq!(rule, "no_rule_matched");
    }

    #[test]
    fn depth_rule_beats_dark_edge() {
        let b = AttributeBundle {
            cut_depth: Some(2.0),
            material_thickness: Some(3.0),
            edge_color: "dark".into(),
            ..bundle()
        };
        assert_eq!(classify(&b), DefectCategory::IncompleteCut);
    }

    #[test]
    fn depth_rule_needs_both_measurements() {
        let b = AttributeBundle {
            cut_depth: Some(2.0),
            ..bundle()
        };
        assert_eq!(classify(&b), DefectCategory::Excluded);

        let through = AttributeBundle {
            cut_depth: Some(3.0),
            material_thickness: Some(3.0),
            ..bundle()
        };
        assert_eq!(classify(&through), DefectCategory::Excluded);
    }

    #[test]
    fn overheating_from_description_or_color() {
        let burnt = AttributeBundle {
            description: "Edge looks BURNT near corner".into(),
            ..bundle()
        };
        assert_eq!(classify(&burnt), DefectCategory::Overheating);

        let charred = AttributeBundle {
            description: "borde carbonizado".into(),
            ..bundle()
        };
        assert_eq!(classify(&charred), DefectCategory::Overheating);

        let dark = AttributeBundle {
            edge_color: " Dark ".into(),
            ..bundle()
        };
        assert_eq!(classify(&dark), DefectCategory::Overheating);

        let darkish = AttributeBundle {
            edge_color: "dark grey".into(),
            ..bundle()
        };
        assert_eq!(classify(&darkish), DefectCategory::Excluded);
    }

    #[test]
    fn overheating_beats_irregular_edge() {
        let b = AttributeBundle {
            edge_color: "oscuro".into(),
            edge_characteristic: "burr".into(),
            ..bundle()
        };
        assert_eq!(classify(&b), DefectCategory::Overheating);
    }

    #[test]
    fn irregular_edge_terms() {
        for text in ["irregular", "heavy BURRS", "fuzzy", "con rebaba", "pelosidad"] {
            let b = AttributeBundle {
                edge_characteristic: text.into(),
                misaligned: true,
                ..bundle()
            };
            assert_eq!(classify(&b), DefectCategory::IrregularEdge, "{text}");
        }
    }

    #[test]
    fn flags_follow_table_order() {
        let all_flags = AttributeBundle {
            misaligned: true,
            dimension_out_of_range: true,
            heat_deformed: true,
            machine_fault: true,
            ..bundle()
        };
        assert_eq!(classify(&all_flags), DefectCategory::Misalignment);

        let b = AttributeBundle {
            misaligned: false,
            ..all_flags.clone()
        };
        assert_eq!(classify(&b), DefectCategory::IncorrectDimension);

        let b = AttributeBundle {
            misaligned: false,
            dimension_out_of_range: false,
            ..all_flags.clone()
        };
        assert_eq!(classify(&b), DefectCategory::HeatDeformation);

        let b = AttributeBundle {
            machine_fault: true,
            ..bundle()
        };
        assert_eq!(classify(&b), DefectCategory::MachineError);
    }

    #[test]
    fn table_covers_every_category_once_in_order() {
        let outcomes: Vec<_> = RULES.iter().map(|r| r.outcome).collect();
        assert_eq!(outcomes, DefectCategory::ALL.to_vec());
    }

    #[test]
    fn first_match_is_generic() {
        let rules: [Rule<i32, &str>; 3] = [
            Rule {
                name: "negative",
                predicate: |v| *v < 0,
                outcome: "neg",
            },
            Rule {
                name: "small",
                predicate: |v| *v < 10,
                outcome: "small",
            },
            Rule {
                name: "any",
                predicate: |_| true,
                outcome: "big",
            },
        ];
        assert_eq!(first_match(&rules, &-3).map(|r| r.outcome), Some("neg"));
        assert_eq!(first_match(&rules, &3).map(|r| r.outcome), Some("small"));
        assert_eq!(first_match(&rules, &30).map(|r| r.name), Some("any"));
        assert!(first_match(&rules[..0], &1).is_none());
    }

    #[test]
    fn deserializes_original_payload_keys() {
        let b: AttributeBundle = serde_json::from_str(
            r#"{ "descripcion": "", "color_borde": "oscuro", "profundidad_corte": 1.0 }"#,
        )
        .unwrap();
        assert_eq!(b.edge_color, "oscuro");
        assert_eq!(b.cut_depth, Some(1.0));
        assert_eq!(classify(&b), DefectCategory::Overheating);
    }

    #[test]
    fn category_labels_and_serde_names() {
        assert_eq!(DefectCategory::IncompleteCut.to_string(), "incomplete cut");
        assert_eq!(
            serde_json::to_string(&DefectCategory::MachineError).unwrap(),
            "\"machine_error\""
        );
    }
}
