use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, error, info};

use crate::contract::{Empresa, PayrollDocument};
use crate::error::ConvertError;

/// Deserializes a payroll export from `reader`. `path` is only used for error reporting.
pub fn parse_document<R: BufRead>(reader: R, path: &Path) -> Result<Empresa, ConvertError> {
    let document: PayrollDocument = quick_xml::de::from_reader(reader).map_err(|e| {
        error!(path = %path.display(), error = ?e, "Failed to deserialize payroll XML");
        ConvertError::Xml {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    let empresa = document.empresa;
    debug!(
        path = %path.display(),
        fantasia = %empresa.fantasia,
        cnpj = %empresa.cnpj,
        mes_ano = %empresa.mes_ano,
        "Parsed company block"
    );
    Ok(empresa)
}

/// Opens and parses the XML file at `path`.
pub fn parse_file(path: &Path) -> Result<Empresa, ConvertError> {
    info!(path = %path.display(), "Reading payroll XML");
    let file = File::open(path).map_err(|e| {
        error!(path = %path.display(), error = ?e, "Failed to open XML file");
        ConvertError::io(path, e)
    })?;
    let empresa = parse_document(BufReader::new(file), path)?;
    info!(
        path = %path.display(),
        employees = empresa.funcionarios.len(),
        "Parsed payroll XML"
    );
    Ok(empresa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Empresa, ConvertError> {
        parse_document(xml.as_bytes(), Path::new("test.xml"))
    }

    #[test]
    fn parses_company_and_employees_in_order() {
        let empresa = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Comissao>
  <Empresa>
    <Fantasia>Loja Centro</Fantasia>
    <Razao>Loja Centro LTDA</Razao>
    <CNPJ>12345678000199</CNPJ>
    <MesAno>01/2024</MesAno>
    <Funcionario>
      <CPF>11111111111</CPF>
      <Valor>100.50</Valor>
      <MetaPremio>10.00</MetaPremio>
    </Funcionario>
    <Funcionario>
      <CPF>22222222222</CPF>
      <Valor>200</Valor>
    </Funcionario>
  </Empresa>
</Comissao>"#,
        )
        .expect("valid document");

        assert_eq!(empresa.fantasia, "Loja Centro");
        assert_eq!(empresa.razao, "Loja Centro LTDA");
        assert_eq!(empresa.cnpj, "12345678000199");
        assert_eq!(empresa.mes_ano, "01/2024");
        assert_eq!(empresa.funcionarios.len(), 2);
        assert_eq!(empresa.funcionarios[0].cpf, "11111111111");
        assert_eq!(empresa.funcionarios[0].meta_premio.as_deref(), Some("10.00"));
        assert_eq!(empresa.funcionarios[1].cpf, "22222222222");
        assert_eq!(empresa.funcionarios[1].meta_premio, None);
    }

    #[test]
    fn leading_zeros_in_identifiers_are_kept() {
        let empresa = parse(
            "<Vales><Empresa><Fantasia>A</Fantasia><Razao>B</Razao><CNPJ>00123</CNPJ>\
             <MesAno>02/2024</MesAno><Funcionario><CPF>00011122233</CPF><Valor>5</Valor>\
             </Funcionario></Empresa></Vales>",
        )
        .expect("valid document");
        assert_eq!(empresa.cnpj, "00123");
        assert_eq!(empresa.funcionarios[0].cpf, "00011122233");
    }

    #[test]
    fn company_without_employees_parses_to_empty_list() {
        let empresa = parse(
            "<Vales><Empresa><Fantasia>A</Fantasia><Razao>B</Razao><CNPJ>1</CNPJ>\
             <MesAno>03/2024</MesAno></Empresa></Vales>",
        )
        .expect("valid document");
        assert!(empresa.funcionarios.is_empty());
    }

    #[test]
    fn missing_required_field_is_an_xml_error() {
        let err = parse(
            "<Vales><Empresa><Fantasia>A</Fantasia><Razao>B</Razao>\
             <MesAno>03/2024</MesAno></Empresa></Vales>",
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Xml { .. }), "got {err:?}");
    }

    #[test]
    fn malformed_xml_is_an_xml_error() {
        let err = parse("<Vales><Empresa><Fantasia>A</Empresa>").unwrap_err();
        assert!(matches!(err, ConvertError::Xml { .. }), "got {err:?}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = parse_file(Path::new("definitely/not/here.xml")).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let empresa = parse(
            "<Comissao><Empresa><Observacao>matriz</Observacao><Fantasia>A</Fantasia>\
             <Razao>B</Razao><CNPJ>1</CNPJ><MesAno>04/2024</MesAno>\
             <Funcionario><CPF>111</CPF><Observacao>ferias</Observacao><Valor>7</Valor>\
             </Funcionario></Empresa></Comissao>",
        )
        .expect("unknown elements must not break parsing");
        assert_eq!(empresa.fantasia, "A");
        assert_eq!(empresa.funcionarios.len(), 1);
        assert_eq!(empresa.funcionarios[0].cpf, "111");
        assert_eq!(empresa.funcionarios[0].valor, "7");
    }

    #[test]
    fn employees_split_by_an_unknown_element_are_all_kept() {
        let empresa = parse(
            "<Comissao><Empresa><Fantasia>A</Fantasia><Razao>B</Razao><CNPJ>1</CNPJ>\
             <MesAno>04/2024</MesAno>\
             <Funcionario><CPF>1</CPF><Valor>1</Valor></Funcionario>\
             <Obs>x</Obs>\
             <Funcionario><CPF>2</CPF><Valor>2</Valor></Funcionario></Empresa></Comissao>",
        )
        .expect("interleaved employees parse");
        let cpfs: Vec<_> = empresa.funcionarios.iter().map(|f| f.cpf.as_str()).collect();
        assert_eq!(cpfs, vec!["1", "2"]);
    }

    #[test]
    fn company_fields_between_employees_are_accepted() {
        let empresa = parse(
            "<Vales><Empresa>\
             <Funcionario><CPF>1</CPF><Valor>1</Valor></Funcionario>\
             <Fantasia>A</Fantasia><Razao>B</Razao><CNPJ>9</CNPJ><MesAno>04/2024</MesAno>\
             <Funcionario><CPF>2</CPF><Valor>2</Valor></Funcionario></Empresa></Vales>",
        )
        .expect("company fields may follow employees");
        assert_eq!(empresa.cnpj, "9");
        assert_eq!(empresa.mes_ano, "04/2024");
        let cpfs: Vec<_> = empresa.funcionarios.iter().map(|f| f.cpf.as_str()).collect();
        assert_eq!(cpfs, vec!["1", "2"]);
    }
}
