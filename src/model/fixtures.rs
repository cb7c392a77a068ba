// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Narrative-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Narrative and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in demo datasets, one per source shape.

use super::ids::{NodeId, StepId};
use super::option::{FlatOption, OptionKind, Step};
use super::tree::TreeNode;

pub const DEMO_DEPTH_LABELS: [&str; 5] =
    ["MACRO", "SECTOR", "THEME", "Stock (Anchor)", "VALUE CHAIN (Suppliers)"];

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("hard-coded fixture node id is valid")
}

fn sid(value: &str) -> StepId {
    StepId::new(value).expect("hard-coded fixture step id is valid")
}

fn opt(
    id: &str,
    parent: Option<&str>,
    kind: OptionKind,
    title: &str,
    subtitle: &str,
    probability: u8,
) -> FlatOption {
    let option = FlatOption::new(nid(id), kind, title, probability).with_subtitle(subtitle);
    match parent {
        Some(parent) => option.with_parent(nid(parent)),
        None => option,
    }
}

fn step(id: &str, title: &str, question: &str, options: Vec<FlatOption>) -> Step {
    let mut step = Step::new(sid(id), title).with_question(question);
    *step.options_mut() = options;
    step
}

/// Five-step flat table: macro trend → key sector → dominant player → value chain → portfolio.
pub fn demo_steps() -> Vec<Step> {
    use OptionKind::{Alternative, Main, Risky};

    vec![
        step(
            "step1",
            "STEP 01. MACRO TREND",
            "Q1. Which wave will shape the next three years?",
            vec![
                opt("ai_supercycle", None, Main, "AI Supercycle", "The AI Supercycle", 90)
                    .with_badge("Megatrend")
                    .with_desc("Data center and server spending keeps compounding."),
                opt("edge_computing", None, Alternative, "On-Device AI", "On-Device AI", 65)
                    .with_badge("Personal AI")
                    .with_desc("Inference moves onto phones and PCs."),
                opt("geopolitics", None, Risky, "Tech Cold War", "Tech Cold War", 40)
                    .with_badge("Supply Chain Reset")
                    .with_desc("Security beats efficiency as blocs decouple."),
            ],
        ),
        step(
            "step2",
            "STEP 02. KEY SECTOR",
            "Q2. Which industry rides that wave best?",
            vec![
                opt("memory_sector", Some("ai_supercycle"), Main, "HBM & Next-Gen Memory", "Memory Sector", 95),
                opt("logic_sector", Some("ai_supercycle"), Alternative, "AI Accelerators", "Compute Sector", 85),
                opt("cooling_power", Some("ai_supercycle"), Risky, "Power & Cooling", "Power & Cooling", 80),
                opt("npu_ip", Some("edge_computing"), Main, "NPU Design IP", "Design IP", 85),
                opt("low_power_mem", Some("edge_computing"), Alternative, "Low Power DRAM", "Low Power Memory", 75),
                opt("foundry_usa", Some("geopolitics"), Main, "US Foundry Reshoring", "US Manufacturing", 70),
                opt("legacy_china", Some("geopolitics"), Risky, "China Legacy Logic", "Legacy Logic", 50),
            ],
        ),
        step(
            "step3",
            "STEP 03. DOMINANT PLAYER",
            "Q3. Who leads that sector?",
            vec![
                opt("sk_hynix", Some("memory_sector"), Main, "SK hynix", "The King", 93),
                opt("samsung_elec", Some("memory_sector"), Alternative, "Samsung Electronics", "Giant Awakens", 55),
                opt("nvidia", Some("logic_sector"), Main, "NVIDIA", "NVDA", 96),
                opt("broadcom", Some("logic_sector"), Alternative, "Broadcom", "AVGO", 82),
                opt("vertiv", Some("cooling_power"), Main, "Vertiv", "VRT", 88),
                opt("arm_holdings", Some("npu_ip"), Main, "Arm Holdings", "ARM", 90),
                opt("micron_tech", Some("low_power_mem"), Main, "Micron", "MU", 65),
                opt("tsmc", Some("foundry_usa"), Main, "TSMC", "TSM", 95),
                opt("smic", Some("legacy_china"), Risky, "SMIC", "981.HK", 45),
            ],
        ),
        step(
            "step4",
            "STEP 04. VALUE CHAIN",
            "Q4. Which partner grows alongside the leader?",
            vec![
                opt("hanmi_semi_eq", Some("sk_hynix"), Main, "Hanmi Semiconductor", "Bonding", 92),
                opt("esti_eq", Some("sk_hynix"), Alternative, "STI", "Reflow", 75),
                opt("soulbrain", Some("samsung_elec"), Main, "Soulbrain", "Materials", 70),
                opt("tsmc_value", Some("nvidia"), Main, "TSMC CoWoS", "CoWoS Eco", 95),
                opt("sub_immersion", Some("vertiv"), Alternative, "Immersion Coolant", "Coolant", 70),
                opt("open_edge", Some("arm_holdings"), Alternative, "OpenEdges", "Korean IP", 60),
            ],
        ),
        step(
            "step5",
            "STEP 05. PORTFOLIO",
            "Q5. What do you finally buy?",
            vec![
                opt("pf_focus", Some("hanmi_semi_eq"), Main, "Concentrated HBM basket", "Focus", 88),
                opt("pf_balanced", None, Alternative, "Balanced AI basket", "Balanced", 70),
            ],
        ),
    ]
}

fn leaf(id: &str, name: &str, value: f64, change: f64, description: &str) -> TreeNode {
    TreeNode::new(nid(id), name).with_index("Price", value, change).with_description(description)
}

fn branch(
    id: &str,
    name: &str,
    (index_name, value, change): (&str, f64, f64),
    description: &str,
    children: Vec<TreeNode>,
) -> TreeNode {
    TreeNode::new(nid(id), name)
        .with_index(index_name, value, change)
        .with_description(description)
        .with_children(children)
}

/// Nested scenario tree: macro → sector → theme → anchor stock → suppliers.
pub fn demo_tree() -> Vec<TreeNode> {
    vec![
        branch(
            "macro_ai",
            "AI Supercycle",
            ("NASDAQ 100", 18542.0, 1.2),
            "AI-led bull market continues",
            vec![
                branch(
                    "sector_semi",
                    "Semiconductors / HBM",
                    ("SOX", 4820.0, 2.5),
                    "Memory supercycle begins",
                    vec![
                        branch(
                            "theme_hbm",
                            "HBM Value Chain",
                            ("Semi IDX", 3200.0, 1.8),
                            "Ecosystem around SK hynix",
                            vec![
                                branch(
                                    "stock_sk",
                                    "SK hynix",
                                    ("Price", 138500.0, 2.8),
                                    "HBM market leader",
                                    vec![
                                        leaf("vc_sk_1", "Hanmi Semiconductor", 62000.0, 4.2, "TC bonders (tier 1)"),
                                        leaf("vc_sk_2", "ISC", 84000.0, 1.5, "Test sockets"),
                                        leaf("vc_sk_3", "STI", 28000.0, 2.1, "Reflow equipment"),
                                    ],
                                ),
                                branch(
                                    "stock_ss",
                                    "Samsung Electronics",
                                    ("Price", 74200.0, 0.2),
                                    "Catching up on HBM",
                                    vec![
                                        leaf("vc_ss_1", "Soulbrain", 240000.0, 0.8, "Etchants and cleaners"),
                                        leaf("vc_ss_2", "Dongjin Semichem", 34000.0, 1.2, "EUV photoresist"),
                                    ],
                                ),
                            ],
                        ),
                        branch(
                            "theme_ondevice",
                            "On-Device AI",
                            ("AI Device", 150.0, 3.2),
                            "AI spreads into phones and PCs",
                            vec![branch(
                                "stock_jeju",
                                "Jeju Semiconductor",
                                ("Price", 18000.0, 5.4),
                                "LP-DDR memory",
                                vec![leaf("vc_jeju_1", "OpenEdges", 22000.0, 2.1, "IP design assets")],
                            )],
                        ),
                    ],
                ),
                branch(
                    "sector_infra",
                    "Power / Infrastructure",
                    ("XLU", 68.2, -0.8),
                    "Data center power crunch",
                    vec![branch(
                        "theme_trans",
                        "Transformer Supercycle",
                        ("Electric", 340.0, 5.2),
                        "North American replacement demand",
                        vec![branch(
                            "stock_hd",
                            "HD Hyundai Electric",
                            ("Price", 120000.0, 6.5),
                            "Record order backlog",
                            vec![
                                leaf("vc_hd_1", "Jeryong Electric", 24000.0, 3.2, "Small transformers"),
                                leaf("vc_hd_2", "Hyosung Heavy Industries", 180000.0, 1.5, "Heavy electrical equipment"),
                                leaf("vc_hd_3", "LS ELECTRIC", 78000.0, 2.4, "Switchgear and transmission"),
                            ],
                        )],
                    )],
                ),
            ],
        ),
        branch(
            "macro_rate",
            "Rate Cuts",
            ("US 10Y", 3.8, -2.1),
            "Liquidity expansion favors growth",
            vec![branch(
                "sector_bio",
                "Bio / Healthcare",
                ("XLV", 145.0, 1.1),
                "Biggest beneficiary of rate cuts",
                vec![branch(
                    "theme_platform",
                    "Drug Platforms",
                    ("Bio Tech", 3400.0, 2.4),
                    "Licensing-out expectations",
                    vec![
                        branch(
                            "stock_alt",
                            "Alteogen",
                            ("Price", 180000.0, 5.1),
                            "Exclusive SC formulation technology",
                            vec![
                                leaf("vc_alt_1", "Merck (MRK)", 120.0, 0.5, "Key partner"),
                                leaf("vc_alt_2", "Samsung Biologics", 820000.0, 0.2, "Potential CMO"),
                            ],
                        ),
                        branch(
                            "stock_lego",
                            "LegoChem Biosciences",
                            ("Price", 55000.0, 2.8),
                            "ADC linker platform",
                            vec![leaf("vc_lego_1", "Orion", 110000.0, -1.2, "Largest shareholder")],
                        ),
                    ],
                )],
            )],
        ),
    ]
}
