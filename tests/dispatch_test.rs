use rbc::Personality;

#[test]
fn alternate_personality_matches_exact_and_suffixed_names() {
    for name in ["rdc", "rdc.exe", "rdc-2.1", "./rdc", "/usr/bin/rdc"] {
        assert_eq!(
            Personality::from_program_name(name),
            Personality::Dc,
            "program name {:?}",
            name
        );
    }
}

#[test]
fn primary_personality_is_the_fallback() {
    for name in ["rbc", "rbc.exe", "rdcfoo", "rdc2", "bc", "dc", ""] {
        assert_eq!(
            Personality::from_program_name(name),
            Personality::Bc,
            "program name {:?}",
            name
        );
    }
}

#[test]
fn each_personality_reports_its_own_name() {
    assert_eq!(Personality::Bc.name(), "rbc");
    assert_eq!(Personality::Dc.name(), "rdc");
}
