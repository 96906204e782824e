use wrp_core::{
    decode, encode, locator_split, locator_to_display_string, Locator, Message, Req, WrpError,
};

#[test]
fn reference_locator() {
    let loc = locator_split("mac:112233445566/myService/myApp").expect("split");
    assert_eq!(loc.scheme, "mac");
    assert_eq!(loc.authority, "112233445566");
    assert_eq!(loc.service, "myService");
    assert_eq!(loc.app, "myApp");
}

#[test]
fn reference_failures() {
    assert_eq!(locator_split("mac:/"), Err(WrpError::NoAuthority));
    assert_eq!(locator_split(":/"), Err(WrpError::NoScheme));
    assert_eq!(locator_split(""), Err(WrpError::InvalidArgs));
}

#[test]
fn spans_borrow_from_the_input() {
    let input = String::from("uuid:1234-5678/svc/app");
    let loc = Locator::split(&input).expect("split");
    let range = input.as_bytes().as_ptr_range();
    for part in [loc.scheme, loc.authority, loc.service, loc.app] {
        assert!(range.contains(&part.as_ptr()));
    }
}

#[test]
fn routes_a_decoded_request_by_its_destination() {
    let req = Req {
        dest: "mac:112233445566/config/getParameterValues".into(),
        source: "dns:webpa.example.com".into(),
        trans_id: "abc".into(),
        ..Default::default()
    };
    let decoded = decode(&encode(&Message::Req(req)).expect("encode")).expect("decode");
    let dest = decoded.dest().expect("req has a dest");
    let loc = Locator::split(dest).expect("split");
    assert_eq!(loc.service, "config");
    assert_eq!(loc.app, "getParameterValues");
}

#[test]
fn display_string() {
    let loc = Locator::split("dns:example.com").expect("split");
    let text = locator_to_display_string(&loc).expect("display");
    assert_eq!(
        text,
        "wrp_locator {\n    .scheme    = 'dns'\n    .authority = 'example.com'\n    .service   = ''\n    .app       = ''\n}\n"
    );
}
