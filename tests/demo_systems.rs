use approx::assert_relative_eq;
use fuzzy_inference::dsl::{is, then};
use fuzzy_inference::{
    Error, ErrorKind, FuzzyVariable, InputKey, Inputs, MamdaniFuzzySystem, MembershipFunction, OutputKey,
    SugenoFunction, SugenoFuzzySystem, SugenoVariable,
};

const RULES: [&str; 2] = [
    "if (input1 is mf1) and (input2 is mf1) then (output is mf1)",
    "if (input1 is mf2) and (input2 is mf2) then (output is mf2)",
];

fn triangles(name: &str) -> FuzzyVariable {
    FuzzyVariable::new(name, 0. ..=1.)
        .unwrap()
        .with_term("mf1", MembershipFunction::triangular(0., 0., 0.5).unwrap())
        .unwrap()
        .with_term("mf2", MembershipFunction::triangular(0., 0.5, 1.).unwrap())
        .unwrap()
        .with_term("mf3", MembershipFunction::triangular(0.5, 1., 1.).unwrap())
        .unwrap()
}

fn mamdani(mut system: MamdaniFuzzySystem) -> (MamdaniFuzzySystem, InputKey, InputKey, OutputKey) {
    let input1 = system.add_input(triangles("input1")).unwrap();
    let input2 = system.add_input(triangles("input2")).unwrap();
    let output = system.add_output(triangles("output")).unwrap();

    for rule in RULES {
        system.add_rule_text(rule).unwrap();
    }

    (system, input1, input2, output)
}

#[test]
fn test_mamdani_demo() {
    let (system, input1, input2, output) = mamdani(MamdaniFuzzySystem::default());
    let mut inputs = Inputs::new();

    inputs.add(input1, 0.45).add(input2, 0.45);

    let outputs = system.calculate(&inputs).unwrap();

    assert_eq!(outputs.len(), 1);
    assert_relative_eq!(outputs.get(output).unwrap(), 0.49706827309236945, epsilon = 1e-9);
}

#[test]
fn test_mamdani_demo_with_configured_methods() {
    let system = MamdaniFuzzySystem::new(
        "prod".parse().unwrap(),
        "max".parse().unwrap(),
        "prod".parse().unwrap(),
        "max".parse().unwrap(),
        "cog".parse().unwrap(),
    );
    let (system, input1, input2, output) = mamdani(system);
    let inputs: Inputs = [(input1, 0.45), (input2, 0.45)].into_iter().collect();

    assert_relative_eq!(
        system.calculate(&inputs).unwrap().get(output).unwrap(),
        0.49987657368550986,
        epsilon = 1e-9
    );
    assert_eq!(system.implication_op().to_string(), "prod");
}

#[test]
fn test_sugeno_demo() {
    let mut system = SugenoFuzzySystem::default();
    let input1 = system.add_input(triangles("input1")).unwrap();
    let input2 = system.add_input(triangles("input2")).unwrap();
    let output = system
        .add_output(
            SugenoVariable::new("output")
                .unwrap()
                .with_function(SugenoFunction::linear("mf1", [(input1, 0.1), (input2, 0.3)], 0.5).unwrap())
                .unwrap()
                .with_function(SugenoFunction::linear("mf2", [(input1, 0.4), (input2, 0.2)], 0.7).unwrap())
                .unwrap(),
        )
        .unwrap();

    for rule in RULES {
        system.add_rule_text(rule).unwrap();
    }

    let mut inputs = Inputs::new();

    inputs.add(input1, 0.45).add(input2, 0.45);

    assert_relative_eq!(
        system.calculate(&inputs).unwrap().get(output).unwrap(),
        0.9664634146341464,
        epsilon = 1e-9
    );
}

#[test]
fn test_builder_rules_match_parsed_rules() {
    let (mut system, input1, input2, output) = mamdani(MamdaniFuzzySystem::default());
    let parsed = system.rules().to_vec();

    system.clear_rules();
    system
        .add_rule(fuzzy_inference::Rule::new(is(input1, 0).and(is(input2, 0)), then(output, 0)))
        .unwrap();
    system
        .add_rule(fuzzy_inference::Rule::new(is(input1, 1).and(is(input2, 1)), then(output, 1)))
        .unwrap();

    assert_eq!(system.rules(), &parsed[..]);
}

#[test]
fn test_rejected_rules_report_kind() {
    let (mut system, ..) = mamdani(MamdaniFuzzySystem::default());
    let cases = [
        ("input1 is mf1 then output is mf1", ErrorKind::Grammar),
        ("if (input1 is mf1 then output is mf1", ErrorKind::Grammar),
        ("if input1 is mf1 and input2 is mf1 or input1 is mf2 then output is mf1", ErrorKind::Grammar),
        ("if input3 is mf1 then output is mf1", ErrorKind::NameResolution),
        ("if input1 is mf1 then input2 is mf1", ErrorKind::Grammar),
    ];

    for (text, kind) in cases {
        let err = system.add_rule_text(text).unwrap_err();

        assert_eq!(err.kind(), kind, "{text}: {err}");
    }

    assert_eq!(system.rules().len(), RULES.len());
}

#[test]
fn test_out_of_range_input() {
    let (system, input1, input2, _) = mamdani(MamdaniFuzzySystem::default());
    let inputs: Inputs = [(input1, 0.45), (input2, 1.5)].into_iter().collect();

    assert!(matches!(
        system.calculate(&inputs),
        Err(Error::OutOfRange { ref variable, .. }) if variable == "input2"
    ));
}
