use worker::{Response, Result};

/// Serve the single interactive page. All interactivity goes through the
/// JSON/SVG routes; the page itself is static.
pub fn render() -> Result<Response> {
    Response::from_html(PAGE_HTML)
}

const PAGE_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>PDF Table Extractor &amp; Visualizer</title>
<style>
  body { font-family: sans-serif; margin: 2rem auto; max-width: 60rem; padding: 0 1rem; color: #222; }
  h1 { font-size: 1.6rem; }
  h2 { font-size: 1.2rem; margin-top: 2rem; }
  #banner { padding: .6rem .8rem; border-radius: 4px; }
  #banner.success { background: #e7f6e7; color: #1d6b1d; }
  #banner.error { background: #fbe9e9; color: #a12622; }
  #banner:empty { display: none; }
  label { margin-right: 1rem; }
  select { margin-left: .3rem; }
  .scroll { max-height: 24rem; overflow: auto; border: 1px solid #ddd; }
  table { border-collapse: collapse; width: 100%; }
  th, td { border: 1px solid #ddd; padding: .3rem .5rem; text-align: left; white-space: nowrap; }
  th { background: #f5f5f5; position: sticky; top: 0; }
  fieldset { display: inline-block; border: none; padding: 0; }
  #viz-warning { background: #fdf3da; color: #7a5a00; padding: .6rem .8rem; border-radius: 4px; }
  #chart svg { max-width: 100%; height: auto; }
  a.download { font-size: .85rem; }
  [hidden] { display: none !important; }
</style>
</head>
<body>
<h1>📊 PDF Table Extractor &amp; Visualizer</h1>

<p><input type="file" id="file" accept="application/pdf,.pdf"></p>
<p id="banner"></p>

<section id="picker" hidden>
  <label>Select a table to view and analyze
    <select id="table-select"></select>
  </label>
</section>

<section id="grid-wrap" hidden>
  <h2>📄 Extracted Table</h2>
  <div id="grid" class="scroll"></div>
  <p><a id="csv-link" class="download" download>Download as CSV</a></p>
</section>

<section id="viz" hidden>
  <h2>📈 Visualize Table Data</h2>
  <p id="viz-warning" hidden></p>
  <div id="controls" hidden>
    <label>Select X-axis <select id="x-select"></select></label>
    <label>Select Y-axis <select id="y-select"></select></label>
    <fieldset>
      <label><input type="radio" name="kind" value="bar"> Bar</label>
      <label><input type="radio" name="kind" value="line"> Line</label>
      <label><input type="radio" name="kind" value="pie"> Pie</label>
    </fieldset>
  </div>
  <div id="chart"></div>
</section>

<script>
(function () {
  'use strict';

  var fileInput = document.getElementById('file');
  var banner = document.getElementById('banner');
  var picker = document.getElementById('picker');
  var tableSelect = document.getElementById('table-select');
  var gridWrap = document.getElementById('grid-wrap');
  var grid = document.getElementById('grid');
  var csvLink = document.getElementById('csv-link');
  var viz = document.getElementById('viz');
  var vizWarning = document.getElementById('viz-warning');
  var controls = document.getElementById('controls');
  var xSelect = document.getElementById('x-select');
  var ySelect = document.getElementById('y-select');
  var chart = document.getElementById('chart');

  var state = { digest: null, file: null, items: [], current: null };

  function setBanner(kind, message) {
    banner.className = kind;
    banner.textContent = message;
  }

  function resetSections() {
    picker.hidden = true;
    gridWrap.hidden = true;
    viz.hidden = true;
    chart.innerHTML = '';
  }

  fileInput.addEventListener('change', upload);

  async function upload() {
    var file = fileInput.files[0];
    if (!file) { return; }
    state.file = file;
    resetSections();
    setBanner('', '');

    var res;
    try {
      res = await fetch('/api/v1/tables', { method: 'POST', body: file });
    } catch (err) {
      setBanner('error', '❌ Upload failed: ' + err);
      return;
    }
    if (!res.ok) {
      setBanner('error', '❌ No tables found in the PDF.');
      return;
    }

    var data = await res.json();
    state.digest = data.digest;
    state.items = data.items;
    if (data.items.length === 0) {
      setBanner('error', '❌ No tables found in the PDF.');
      return;
    }

    setBanner('success', '✅ Found ' + data.table_count + ' table(s) in the PDF.');
    tableSelect.innerHTML = '';
    data.items.forEach(function (item, index) {
      var option = document.createElement('option');
      option.value = String(index);
      option.textContent = item.label;
      tableSelect.append(option);
    });
    picker.hidden = false;
    selectTable(0);
  }

  tableSelect.addEventListener('change', function () {
    selectTable(Number(tableSelect.value));
  });

  async function selectTable(index) {
    var item = state.items[index];
    if (!item) { return; }

    var base = state.digest + '/' + item.page + '/' + item.table_index;
    var res = await fetch('/api/v1/tables/' + base);
    if (res.status === 404 && state.file) {
      // Cached extraction expired; re-post the file we still hold.
      upload();
      return;
    }
    if (!res.ok) {
      setBanner('error', '❌ Failed to load the selected table.');
      return;
    }

    var detail = await res.json();
    state.current = item;
    csvLink.href = '/api/v1/csv/' + base;
    renderGrid(detail);
    gridWrap.hidden = false;
    setupViz(detail);
  }

  function cellText(cell) {
    return cell === null || cell === undefined ? '' : String(cell);
  }

  function renderGrid(detail) {
    var table = document.createElement('table');
    var thead = document.createElement('thead');
    var headRow = document.createElement('tr');
    detail.columns.forEach(function (column) {
      var th = document.createElement('th');
      th.textContent = column;
      headRow.append(th);
    });
    thead.append(headRow);
    table.append(thead);

    var tbody = document.createElement('tbody');
    detail.rows.forEach(function (row) {
      var tr = document.createElement('tr');
      row.forEach(function (cell) {
        var td = document.createElement('td');
        td.textContent = cellText(cell);
        tr.append(td);
      });
      tbody.append(tr);
    });
    table.append(tbody);

    grid.innerHTML = '';
    grid.append(table);
  }

  function setupViz(detail) {
    viz.hidden = false;
    chart.innerHTML = '';

    if (detail.chart_warning) {
      vizWarning.textContent = '⚠️ ' + detail.chart_warning.message;
      vizWarning.hidden = false;
      controls.hidden = true;
      return;
    }

    vizWarning.hidden = true;
    controls.hidden = false;

    xSelect.innerHTML = '';
    detail.columns.forEach(function (column, index) {
      var option = document.createElement('option');
      option.value = String(index);
      option.textContent = column;
      xSelect.append(option);
    });

    ySelect.innerHTML = '';
    detail.numeric_columns.forEach(function (index) {
      var option = document.createElement('option');
      option.value = String(index);
      option.textContent = detail.columns[index];
      ySelect.append(option);
    });

    // No chart until the user explicitly picks a type.
    document.querySelectorAll('input[name="kind"]').forEach(function (radio) {
      radio.checked = false;
    });
  }

  document.querySelectorAll('input[name="kind"]').forEach(function (radio) {
    radio.addEventListener('change', drawChart);
  });
  xSelect.addEventListener('change', drawChart);
  ySelect.addEventListener('change', drawChart);

  async function drawChart() {
    var kind = document.querySelector('input[name="kind"]:checked');
    if (!kind || !state.current) { return; }

    var params = new URLSearchParams({
      x: xSelect.value,
      y: ySelect.value,
      kind: kind.value
    });
    var base = state.digest + '/' + state.current.page + '/' + state.current.table_index;
    var res = await fetch('/api/v1/chart/' + base + '?' + params.toString());
    if (!res.ok) { return; }
    chart.innerHTML = await res.text();
  }
}());
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::PAGE_HTML;

    #[test]
    fn page_mentions_every_chart_kind() {
        for kind in ["bar", "line", "pie"] {
            assert!(PAGE_HTML.contains(&format!("value=\"{kind}\"")));
        }
    }

    #[test]
    fn page_posts_uploads_to_the_tables_route() {
        assert!(PAGE_HTML.contains("/api/v1/tables"));
        assert!(PAGE_HTML.contains("accept=\"application/pdf"));
    }
}
