//! Mapping from stored records and upstream payloads to the API's wire types.

use crate::models::{ApiCepResponse, EnderecoView, Pessoa, PessoaView, PessoasListView};

/// Projects a stored person onto its public fields, dropping the surrogate id.
pub fn to_view(pessoa: &Pessoa) -> PessoaView {
    PessoaView {
        nome: pessoa.nome.clone(),
        cpf: pessoa.cpf.clone(),
        cep: pessoa.cep.clone(),
        rua: pessoa.rua.clone(),
        bairro: pessoa.bairro.clone(),
        cidade: pessoa.cidade.clone(),
        estado: pessoa.estado.clone(),
    }
}

pub fn to_view_list(pessoas: &[Pessoa]) -> PessoasListView {
    PessoasListView {
        pessoas: pessoas.iter().map(to_view).collect(),
    }
}

/// Renames the CEP upstream fields to the service's vocabulary.
pub fn to_address_view(endereco: ApiCepResponse) -> EnderecoView {
    EnderecoView {
        rua: endereco.address,
        bairro: endereco.district,
        cidade: endereco.city,
        estado: endereco.state,
    }
}
