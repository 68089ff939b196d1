mod common;

use cashbook_core::{
    book::{Account, AccountType, Commodity, ControlFlag, ROOT_ACCOUNT_NAME},
    ValidationError,
};
use common::{eur, new_book, root};

#[test]
fn parentless_non_root_account_is_rejected() {
    let mut book = new_book();
    let eur = eur(&book);

    book.add_account(Account::new("test account", AccountType::Asset, &eur));
    assert!(matches!(
        book.validate(),
        Err(ValidationError::InvalidHierarchy(_))
    ));
    book.cancel();
    assert!(book.validate().is_ok());
}

#[test]
fn parentless_root_with_wrong_name_is_rejected() {
    let mut book = new_book();
    let eur = eur(&book);

    book.add_account(Account::new("test account", AccountType::Root, &eur));
    assert!(matches!(
        book.validate(),
        Err(ValidationError::InvalidHierarchy(_))
    ));
    book.cancel();
    assert_eq!(book.query().all_accounts().len(), 2);
}

#[test]
fn second_root_account_is_rejected() {
    let mut book = new_book();
    let eur = eur(&book);

    book.add_account(Account::new(ROOT_ACCOUNT_NAME, AccountType::Root, &eur));
    let errors = book.validation_errors();
    assert!(errors.iter().any(|err| {
        matches!(err, ValidationError::InvalidHierarchy(msg) if msg.contains("exactly one"))
    }));
}

#[test]
fn same_name_and_parent_is_a_duplicate() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    book.add_account(Account::new("test account", AccountType::Asset, &eur).with_parent(racc));
    book.add_account(Account::new("test account", AccountType::Asset, &eur).with_parent(racc));
    assert_eq!(
        book.validate(),
        Err(ValidationError::DuplicateName {
            parent: ROOT_ACCOUNT_NAME.into(),
            name: "test account".into(),
        })
    );
    assert!(book.flush().is_err());
    assert!(book.query().accounts().is_empty());
}

#[test]
fn same_name_under_different_parents_is_allowed() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    let acc1 =
        book.add_account(Account::new("test account", AccountType::Asset, &eur).with_parent(racc));
    let acc2 =
        book.add_account(Account::new("test account", AccountType::Asset, &eur).with_parent(acc1));
    book.flush().expect("flush nested accounts");

    assert_eq!(book.query().fullname(acc1).as_deref(), Some("test account"));
    assert_eq!(
        book.query().fullname(acc2).as_deref(),
        Some("test account:test account")
    );
}

#[test]
fn standard_asset_account() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    let id = book.add_account(
        Account::new("test account", AccountType::Asset, &eur).with_parent(racc),
    );
    book.flush().expect("flush");

    let state = book.query();
    assert_eq!(state.accounts().len(), 1);
    let acc = state.account(id).expect("account");
    assert!(!acc.non_std_scu());
    assert_eq!(acc.commodity_scu(), eur.fraction);
    assert!(book.get_balance(id, None).is_zero());
    let today = chrono::Utc::now().date_naive();
    assert!(book.get_balance(id, Some(today)).is_zero());
    assert_eq!(acc.sign(), Some(1));
    assert!(!state.is_template(id));
}

#[test]
fn standard_liability_account() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    let id = book.add_account(
        Account::new("test account", AccountType::Liability, &eur).with_parent(racc),
    );
    book.flush().expect("flush");

    let acc = book.query().account(id).expect("account");
    assert_eq!(book.query().accounts().len(), 1);
    assert_eq!(acc.commodity_scu(), eur.fraction);
    assert!(book.get_balance(id, None).is_zero());
    assert_eq!(acc.sign(), Some(-1));
}

#[test]
fn unknown_type_fails_at_validation() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    book.add_account(Account::new("test account", "FOO", &eur).with_parent(racc));
    assert_eq!(
        book.validate(),
        Err(ValidationError::InvalidType {
            account: "test account".into(),
            value: "FOO".into(),
        })
    );
}

#[test]
fn commodity_outside_the_book_is_rejected() {
    let mut book = new_book();
    let racc = root(&book);
    let baz = Commodity::new("FOO", "BAZ", "cuz", 100);

    book.add_account(Account::new("test account", AccountType::Asset, &baz).with_parent(racc));
    let err = book.flush().unwrap_err();
    assert!(matches!(err, ValidationError::CrossBookReference { .. }));
}

#[test]
fn commodity_owned_by_another_book_is_rejected() {
    let mut book = new_book();
    let other = new_book();
    let foreign = eur(&other);
    let racc = root(&book);

    book.add_account(Account::new("foreign", AccountType::Asset, &foreign).with_parent(racc));
    let errors = book.validation_errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ValidationError::CrossBookReference { entity, .. } if entity == "foreign"
    ));
}

#[test]
fn attached_commodity_can_be_used() {
    let mut book = new_book();
    let racc = root(&book);
    let usd = Commodity::currency("USD", 100);
    book.add_commodity(usd.clone());
    book.add_account(Account::new("dollars", AccountType::Bank, &usd).with_parent(racc));
    book.flush().expect("flush usd account");
    assert!(book.query().find_commodity("CURRENCY", "USD").is_some());
}

#[test]
fn duplicate_commodity_is_rejected() {
    let mut book = new_book();
    book.add_commodity(Commodity::currency("EUR", 100));
    assert_eq!(
        book.validate(),
        Err(ValidationError::DuplicateCommodity {
            namespace: "CURRENCY".into(),
            mnemonic: "EUR".into(),
        })
    );
}

#[test]
fn children_given_at_construction_are_attached() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    let acc = book.add_account(
        Account::new("test account", AccountType::Asset, &eur)
            .with_parent(racc)
            .with_children(vec![Account::new(
                "test sub-account",
                AccountType::Asset,
                &eur,
            )]),
    );
    book.flush().expect("flush");

    let children = book.query().children(acc);
    assert_eq!(children.len(), 1);
    assert_eq!(
        book.query().fullname(children[0].id).as_deref(),
        Some("test account:test sub-account")
    );
}

#[test]
fn unicode_names_are_accepted() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    let id = book.add_account(
        Account::new("inouï étrange", AccountType::Asset, &eur).with_parent(racc),
    );
    book.flush().expect("flush");
    assert_eq!(book.query().accounts().len(), 1);
    assert!(format!("{:?}", book.query().account(id)).len() >= 2);
}

#[test]
fn root_subaccount_needs_control_mode() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    book.add_account(Account::new("subroot account", AccountType::Root, &eur).with_parent(racc));
    assert!(matches!(
        book.validate(),
        Err(ValidationError::InvalidHierarchy(_))
    ));

    book.control_mode_mut()
        .insert(ControlFlag::AllowRootSubaccounts);
    book.validate().expect("allowed by control mode");
    assert_eq!(book.working().accounts().len(), 1);
}

#[test]
fn cyclic_parents_are_rejected() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    let a = book.add_account(Account::new("a", AccountType::Asset, &eur).with_parent(racc));
    let b = book.add_account(Account::new("b", AccountType::Asset, &eur).with_parent(a));
    book.account_mut(a).expect("pending account").parent_id = Some(b);

    let errors = book.validation_errors();
    assert!(errors.iter().any(|err| {
        matches!(err, ValidationError::InvalidHierarchy(msg) if msg.contains("cyclic"))
    }));
}

#[test]
fn scu_override_survives_flush() {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);

    let id = book.add_account(Account::new("test", AccountType::Asset, &eur).with_parent(racc));
    book.account_mut(id)
        .expect("pending account")
        .set_commodity_scu(Some(1000));
    book.flush().expect("flush");

    let acc = book.query().account(id).expect("account");
    assert_eq!(acc.commodity_scu(), 1000);
    assert!(acc.non_std_scu());
}

#[test]
fn template_tree_is_hidden_from_accounts() {
    let mut book = new_book();
    let eur = eur(&book);
    let template = book.query().template_root().expect("template root").id;

    let id = book.add_account(
        Account::new("scheduled", AccountType::Asset, &eur).with_parent(template),
    );
    book.flush().expect("flush");

    assert!(book.query().is_template(id));
    assert!(book.query().accounts().is_empty());
    assert!(book.query().find_account("scheduled").is_none());
}
