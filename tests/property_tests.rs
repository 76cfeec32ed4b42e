/// Property-based tests using proptest
/// Tests invariants of validation and view mapping that should hold for all inputs
use pessoa_api::models::{validate_cep, validate_cpf, Pessoa, PessoaRequest, CPF_MAX_LEN};
use pessoa_api::views::{to_view, to_view_list};
use proptest::prelude::*;

fn field(max: usize) -> impl Strategy<Value = String> {
    proptest::string::string_regex(&format!("[A-Za-z0-9çãé][A-Za-z0-9 çãé-]{{0,{}}}", max - 1))
        .unwrap()
}

prop_compose! {
    fn valid_request()(
        nome in field(60),
        cpf in field(15),
        cep in field(9),
        rua in field(20),
        bairro in field(15),
        cidade in field(15),
        estado in field(15),
    ) -> PessoaRequest {
        PessoaRequest { nome, cpf, cep, rua, bairro, cidade, estado }
    }
}

// Property: validation never panics and accepts everything within the column widths
proptest! {
    #[test]
    fn cpf_validation_never_panics(cpf in "\\PC*") {
        let _ = validate_cpf(&cpf);
    }

    #[test]
    fn cep_validation_never_panics(cep in "\\PC*") {
        let _ = validate_cep(&cep);
    }

    #[test]
    fn valid_requests_pass_unchanged(req in valid_request()) {
        let nova = req.clone().validate().unwrap();
        prop_assert_eq!(nova.nome, req.nome);
        prop_assert_eq!(nova.cpf, req.cpf);
        prop_assert_eq!(nova.cep, req.cep);
        prop_assert_eq!(nova.rua, req.rua);
        prop_assert_eq!(nova.bairro, req.bairro);
        prop_assert_eq!(nova.cidade, req.cidade);
        prop_assert_eq!(nova.estado, req.estado);
    }

    #[test]
    fn overlong_cpf_is_rejected(req in valid_request(), extra in "[0-9]{1,10}") {
        let mut req = req;
        req.cpf = format!("{}{}", "1".repeat(CPF_MAX_LEN), extra);
        prop_assert!(req.validate().is_err());
    }
}

// Property: CEP normalization always yields XXXXX-XXX with the same digits
proptest! {
    #[test]
    fn cep_normalization_preserves_digits(head in "[0-9]{5}", tail in "[0-9]{3}", dash in proptest::bool::ANY) {
        let raw = if dash { format!("{}-{}", head, tail) } else { format!("{}{}", head, tail) };
        let normalized = validate_cep(&raw).unwrap();
        prop_assert_eq!(normalized, format!("{}-{}", head, tail));
    }
}

// Property: views mirror the record minus the surrogate id
proptest! {
    #[test]
    fn view_mirrors_record(id in any::<i32>(), req in valid_request()) {
        let pessoa = Pessoa {
            id,
            nome: req.nome,
            cpf: req.cpf,
            cep: req.cep,
            rua: req.rua,
            bairro: req.bairro,
            cidade: req.cidade,
            estado: req.estado,
        };
        let view = to_view(&pessoa);
        prop_assert_eq!(&view.nome, &pessoa.nome);
        prop_assert_eq!(&view.cpf, &pessoa.cpf);
        prop_assert_eq!(&view.estado, &pessoa.estado);

        let list = to_view_list(std::slice::from_ref(&pessoa));
        prop_assert_eq!(list.pessoas, vec![view]);
    }
}
