//! Multi-record documents compiled end to end.

use anyhow::Result;
use make_ssh_config::compile;
use make_ssh_config::core::LayerError;

#[test]
fn test_base_port_example() -> Result<()> {
    make_ssh_config::test_utils::init_test_logging(None);

    let out = compile(
        r#"
- name: base
  vars: { p: 22 }
  config: { Port: "{{p}}" }
- merge: base
  host: example.com
"#,
    )?;

    assert_eq!(out, "Host example.com\n    Port 22\n\n");
    Ok(())
}

#[test]
fn test_emission_follows_declaration_order() -> Result<()> {
    let out = compile(
        r#"
- name: common
  config:
    ServerAliveInterval: 30
    User: ops
- name: zeta
  merge: common
  host: zeta.example.com
- match: { canonical: true, all: true }
  config: { IdentitiesOnly: true }
- name: unused-template
  config: { User: nobody }
- name: alpha
  merge: [common, zeta]
  host: [alpha.example.com, "alpha-*"]
  config:
    serveraliveinterval: ~
    IdentityFile: [~/.ssh/alpha, ~/.ssh/shared]
"#,
    )?;

    let expected = "\
Host zeta.example.com
    ServerAliveInterval 30
    User ops

Match canonical all
    IdentitiesOnly yes

Host alpha.example.com alpha-*
    User ops
    IdentityFile ~/.ssh/alpha
    IdentityFile ~/.ssh/shared

";
    assert_eq!(out, expected);
    Ok(())
}

#[test]
fn test_match_block_with_templated_criteria() -> Result<()> {
    let out = compile(
        r#"
- name: corp
  vars:
    domain: corp.example
    users: [alice, bob]
  match:
    host: "*.{{ domain }}"
    user: "{{ users }}"
    exec: "test -r ~/.corp"
  config:
    ProxyCommand: "ssh -W %h:%p gw.{{ domain }}"
"#,
    )?;

    assert_eq!(
        out,
        concat!(
            "Match host *.corp.example user alice,bob exec test -r ~/.corp\n",
            "    ProxyCommand \"ssh -W %h:%p gw.corp.example\"\n\n",
        )
    );
    Ok(())
}

#[test]
fn test_vars_chain_through_layers() -> Result<()> {
    let out = compile(
        r#"
- name: site
  vars: { domain: lan, port: 2200 }
- name: web
  merge: site
  vars: { port: "{{ port + 1 }}" }
  host: "{{ name }}.{{ domain }}"
  config:
    HostName: "{{ host | first }}"
    Port: "{{ port }}"
"#,
    )?;

    assert_eq!(out, "Host web.lan\n    HostName web.lan\n    Port 2201\n\n");
    Ok(())
}

#[test]
fn test_template_only_document_is_empty() -> Result<()> {
    let out = compile("- name: a\n  config: { User: x }\n- name: b\n  merge: a\n")?;
    assert_eq!(out, "");
    assert_eq!(compile("")?, "");
    Ok(())
}

#[test]
fn test_first_error_aborts() {
    let err = compile(
        r#"
- host: fine
- name: dup-selector
  host: a
  match: { user: root }
- merge: never-reached
"#,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to process record #1 ('dup-selector')");
    assert!(matches!(err.downcast_ref::<LayerError>(), Some(LayerError::HostAndMatch)));
}

#[test]
fn test_match_all_with_other_criteria_rejected() {
    let err = compile("- match: { all: true, host: [x] }\n").unwrap_err();
    assert!(matches!(err.downcast_ref::<LayerError>(), Some(LayerError::MatchAllNotAlone)));
}

#[test]
fn test_quote_in_multi_word_value_rejected() {
    let err = compile("- host: a\n  config: { RemoteCommand: 'echo \"hi there\"' }\n").unwrap_err();
    assert!(matches!(err.downcast_ref::<LayerError>(), Some(LayerError::QuoteInValue { .. })));
}

#[test]
fn test_unknown_record_key_rejected() {
    let err = compile("- name: a\n  hostname: b\n").unwrap_err();
    let layer_error = err.downcast_ref::<LayerError>().unwrap();
    assert_eq!(layer_error.to_string(), "Invalid layer attribute 'hostname'");
}

#[test]
fn test_float_values_rejected_at_decode() {
    let err = compile("- host: a\n  config: { ConnectTimeout: 2.5 }\n").unwrap_err();
    assert!(matches!(err.downcast_ref::<LayerError>(), Some(LayerError::Decode { .. })));
}

#[test]
fn test_empty_host_list_layer_is_mergeable() -> Result<()> {
    let out = compile(
        r#"
- name: pool
  vars: { members: [] }
  host: "{{ members }}"
  config: { User: pool }
- merge: pool
  host: ok
"#,
    )?;

    assert_eq!(out, "Host ok\n    User pool\n\n");
    Ok(())
}
